use clap::Parser;
use ff_engine::{Character, CombatEngine, Dice, RoundOutcome, Rules, Stats};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "simulate-fights")]
#[command(about = "Monte Carlo sim: many seeded fights between fixed stat lines")]
struct Args {
    /// Number of trials
    #[arg(long, default_value_t = 1000)]
    trials: u32,

    /// Safety cap on rounds per trial
    #[arg(long, default_value_t = 100)]
    max_rounds: u32,

    /// Player skill
    #[arg(long, default_value_t = 10)]
    skill: i32,

    /// Player luck
    #[arg(long, default_value_t = 9)]
    luck: i32,

    /// Player stamina
    #[arg(long, default_value_t = 20)]
    stamina: i32,

    /// Enemy skill
    #[arg(long, default_value_t = 8)]
    enemy_skill: i32,

    /// Enemy stamina
    #[arg(long, default_value_t = 10)]
    enemy_stamina: i32,

    /// Test luck after every round the player loses
    #[arg(long, default_value_t = false)]
    luck_on_loss: bool,

    /// RNG base seed (trial i uses seed+i)
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Optional rules YAML (falls back to the built-in rules)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Serialize, Default)]
struct Summary {
    trials: u32,
    player_wins: u32,
    enemy_wins: u32,
    unfinished: u32,
    avg_rounds: f64,
    luck_tests: u32,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let rules = match &args.rules {
        Some(path) => Rules::load(path)?,
        None => Rules::builtin()?,
    };

    let player = stat_line(args.skill, args.luck, args.stamina);
    let enemy = stat_line(args.enemy_skill, 0, args.enemy_stamina);

    let mut summary = Summary {
        trials: args.trials,
        ..Summary::default()
    };
    let mut total_rounds: u64 = 0;

    for i in 0..args.trials {
        let mut dice = Dice::from_seed(args.seed.wrapping_add(i as u64));
        let hero = Character::with_stats(rules.default_name.clone(), player, &rules);
        let foe = Character::with_stats(rules.enemy_name.clone(), enemy, &rules);
        let mut engine = CombatEngine::new(hero, Some(foe), rules.clone());

        let mut rounds = 0u32;
        while rounds < args.max_rounds
            && !engine.player().is_defeated()
            && !engine.enemy().is_defeated()
        {
            rounds += 1;
            let report = engine.fight_round(&mut dice);
            if args.luck_on_loss && report.outcome == RoundOutcome::EnemyWin {
                engine.roll_luck_check(&mut dice);
                summary.luck_tests += 1;
            }
        }
        total_rounds += u64::from(rounds);

        match (engine.player().is_defeated(), engine.enemy().is_defeated()) {
            (false, true) => summary.player_wins += 1,
            (true, false) => summary.enemy_wins += 1,
            _ => summary.unfinished += 1,
        }
    }

    if args.trials > 0 {
        summary.avg_rounds = total_rounds as f64 / f64::from(args.trials);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        let pct = |n: u32| {
            if summary.trials == 0 {
                0.0
            } else {
                100.0 * f64::from(n) / f64::from(summary.trials)
            }
        };
        println!(
            "trials={} player_wins={} ({:.1}%) enemy_wins={} ({:.1}%) unfinished={} avg_rounds={:.2} luck_tests={}",
            summary.trials,
            summary.player_wins,
            pct(summary.player_wins),
            summary.enemy_wins,
            pct(summary.enemy_wins),
            summary.unfinished,
            summary.avg_rounds,
            summary.luck_tests
        );
    }
    Ok(())
}

fn stat_line(skill: i32, luck: i32, stamina: i32) -> Stats {
    Stats {
        skill,
        luck,
        stamina,
        rations: 0,
    }
}

use anyhow::{bail, Context};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use ff_engine::{
    read_text_auto, Character, CharacterSheet, CombatEngine, Dice, Log, Roller, RoundOutcome,
    Rules, Side, Stats,
};
use serde::Serialize;
use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum LuckPolicy {
    /// Never test luck
    Never,
    /// Test luck after every decisive round
    Always,
    /// Test luck only after losing a round
    OnLoss,
}

#[derive(Subcommand)]
enum Cmd {
    /// Throw dice: one uniform value over [dice, dice*sides] per roll
    Roll {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Number of dice
        #[arg(long, default_value_t = 1)]
        dice: u32,
        /// Sides per die
        #[arg(long, default_value_t = 6)]
        sides: u32,
        /// Number of rolls
        #[arg(long, default_value_t = 5)]
        rolls: u32,
    },
    /// Roll up a fresh character
    Stats {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Character name (defaults to the rules' default name)
        #[arg(long)]
        name: Option<String>,
        /// Print the character as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Fight a battle round by round until someone drops or the round cap is hit
    Fight {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Character JSON file for the player (otherwise stats are rolled)
        #[arg(long)]
        player: Option<PathBuf>,
        /// Override player skill
        #[arg(long)]
        skill: Option<i32>,
        /// Override player luck
        #[arg(long)]
        luck: Option<i32>,
        /// Override player stamina
        #[arg(long)]
        stamina: Option<i32>,
        /// Enemy name
        #[arg(long)]
        enemy_name: Option<String>,
        /// Enemy skill (with --enemy-stamina; both omitted = default enemy)
        #[arg(long)]
        enemy_skill: Option<i32>,
        /// Enemy stamina
        #[arg(long)]
        enemy_stamina: Option<i32>,
        /// Safety cap on rounds
        #[arg(long, default_value_t = 50)]
        rounds: u32,
        /// When to test luck after a round
        #[arg(long, value_enum, default_value_t = LuckPolicy::Never)]
        luck_policy: LuckPolicy,
        /// Show the newest log entry first
        #[arg(long, default_value_t = false)]
        reverse: bool,
        /// Print a JSON summary instead of the logbook
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Interactive session on stdin: character sheet plus battles
    Play {
        /// RNG seed (omit for a random session)
        #[arg(long)]
        seed: Option<u64>,
        /// Character JSON file to start from
        #[arg(long)]
        player: Option<PathBuf>,
        /// Show log entries oldest first
        #[arg(long, default_value_t = false)]
        chronological: bool,
    },
}

#[derive(Parser)]
#[command(name = "ff")]
#[command(about = "Fighting Fantasy combat and logbook harness")]
struct Cli {
    /// Rules YAML replacing the built-in constants and log text
    #[arg(long, global = true)]
    rules: Option<PathBuf>,
    /// Diagnostics on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Serialize)]
struct FightSummary<'a> {
    winner: &'static str,
    rounds: u32,
    player: &'a Character,
    enemy: &'a Character,
    log: Vec<&'a Log>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let rules = load_rules(cli.rules.as_deref())?;

    match cli.cmd {
        Cmd::Roll {
            seed,
            dice,
            sides,
            rolls,
        } => {
            let mut rng = Dice::from_seed(seed);
            for _ in 0..rolls {
                println!("{}", rng.roll(dice, sides));
            }
        }
        Cmd::Stats { seed, name, json } => {
            let mut rng = Dice::from_seed(seed);
            let name = name.unwrap_or_else(|| rules.default_name.clone());
            let character = Character::rolled(name, &rules, &mut rng);
            if json {
                println!("{}", serde_json::to_string_pretty(&character)?);
            } else {
                println!("{}", stat_line(&character));
            }
        }
        Cmd::Fight {
            seed,
            player,
            skill,
            luck,
            stamina,
            enemy_name,
            enemy_skill,
            enemy_stamina,
            rounds,
            luck_policy,
            reverse,
            json,
        } => {
            let mut rng = Dice::from_seed(seed);
            let mut hero = match player {
                Some(path) => load_character(&path)?,
                None => Character::rolled(rules.default_name.clone(), &rules, &mut rng),
            };
            hero.stats.skill = skill.unwrap_or(hero.stats.skill);
            hero.stats.luck = luck.unwrap_or(hero.stats.luck);
            hero.stats.stamina = stamina.unwrap_or(hero.stats.stamina);
            let enemy = build_enemy(&rules, enemy_name, enemy_skill, enemy_stamina);

            let mut engine = CombatEngine::new(hero, enemy, rules);
            let fought = run_fight(&mut engine, &mut rng, rounds, luck_policy);

            if json {
                let summary = FightSummary {
                    winner: winner(&engine),
                    rounds: fought,
                    player: engine.player(),
                    enemy: engine.enemy(),
                    log: engine.logbook().window().collect(),
                };
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", engine.render_log(reverse));
                println!("---");
                println!("rounds={} winner={}", fought, winner(&engine));
                println!("{}", stat_line(engine.player()));
                println!("{}", stat_line(engine.enemy()));
            }
        }
        Cmd::Play {
            seed,
            player,
            chronological,
        } => {
            let mut rng = match seed {
                Some(s) => Dice::from_seed(s),
                None => Dice::from_entropy(),
            };
            let character = match player {
                Some(path) => load_character(&path)?,
                None => Character::new(&rules),
            };
            let stdin = io::stdin();
            let mut out = io::stdout().lock();
            play(
                stdin.lock(),
                &mut out,
                CharacterSheet::new(character, rules),
                &mut rng,
                !chronological,
            )?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_rules(path: Option<&Path>) -> anyhow::Result<Rules> {
    match path {
        Some(path) => Rules::load(path),
        None => Ok(Rules::builtin()?),
    }
}

fn load_character(path: &Path) -> anyhow::Result<Character> {
    let text = read_text_auto(path)?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse character JSON: {}", path.display()))
}

fn build_enemy(
    rules: &Rules,
    name: Option<String>,
    skill: Option<i32>,
    stamina: Option<i32>,
) -> Option<Character> {
    if name.is_none() && skill.is_none() && stamina.is_none() {
        return None;
    }
    let stats = Stats {
        skill: skill.unwrap_or(rules.default_stats.skill),
        stamina: stamina.unwrap_or(rules.default_stats.stamina),
        ..rules.default_stats
    };
    let name = name.unwrap_or_else(|| rules.enemy_name.clone());
    Some(Character::with_stats(name, stats, rules))
}

fn run_fight(engine: &mut CombatEngine, rng: &mut Dice, max_rounds: u32, luck: LuckPolicy) -> u32 {
    let mut rounds = 0u32;
    while rounds < max_rounds && !engine.player().is_defeated() && !engine.enemy().is_defeated() {
        rounds += 1;
        let report = engine.fight_round(rng);
        let test_luck = match luck {
            LuckPolicy::Never => false,
            LuckPolicy::Always => report.outcome != RoundOutcome::Draw,
            LuckPolicy::OnLoss => report.outcome == RoundOutcome::EnemyWin,
        };
        if test_luck {
            engine.roll_luck_check(rng);
        }
    }
    rounds
}

fn winner(engine: &CombatEngine) -> &'static str {
    match (engine.player().is_defeated(), engine.enemy().is_defeated()) {
        (false, true) => "player",
        (true, false) => "enemy",
        _ => "none",
    }
}

fn stat_line(c: &Character) -> String {
    format!(
        "{}: skill={} luck={} stamina={} rations={}",
        c.name, c.stats.skill, c.stats.luck, c.stats.stamina, c.stats.rations
    )
}

const HELP: &str = "\
commands:
  show                      character (and enemy) stats
  stat <key> <delta>        change skill/luck/stamina/rations
  enemy <key> <delta>       change an enemy stat (battle only)
  eat                       eat a ration
  luck                      test your luck
  reroll                    roll new stats
  name <text>               rename the character
  potion <text>             set the potion
  clear-potion              use up the potion
  battle [skill stamina [name]]  start a battle
  fight                     fight one round (battle only)
  end                       leave the battle
  log                       show the logbook
  clear                     clear the logbook
  help                      this text
  quit                      leave";

/// What the session loop does after a command.
enum Step {
    Render,
    Quiet,
    Quit,
    StartBattle(Option<Character>),
    EndBattle,
}

/// Line-driven front end: a character sheet, and a combat screen while a
/// battle is running. The logbook is reprinted after every command that
/// changes it.
fn play<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    mut sheet: CharacterSheet,
    rng: &mut Dice,
    reverse: bool,
) -> anyhow::Result<()> {
    let mut battle: Option<CombatEngine> = None;
    writeln!(out, "{}", stat_line(sheet.character()))?;

    for line in input.lines() {
        let line = line?;
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else { continue };
        let rest: Vec<&str> = words.collect();

        let step = match cmd {
            "quit" | "exit" => Ok(Step::Quit),
            "help" => {
                writeln!(out, "{}", HELP)?;
                Ok(Step::Quiet)
            }
            "show" => {
                match battle.as_ref() {
                    Some(engine) => {
                        writeln!(out, "{}", stat_line(engine.player()))?;
                        writeln!(out, "{}", stat_line(engine.enemy()))?;
                    }
                    None => writeln!(out, "{}", stat_line(sheet.character()))?,
                }
                Ok(Step::Quiet)
            }
            "log" => Ok(Step::Render),
            _ => match battle.as_mut() {
                Some(engine) => battle_command(engine, cmd, &rest, rng),
                None => sheet_command(&mut sheet, cmd, &rest, rng),
            },
        };

        match step {
            Ok(Step::Quit) => break,
            Ok(Step::Quiet) => continue,
            Ok(Step::StartBattle(enemy)) => battle = Some(sheet.start_battle(enemy)),
            Ok(Step::EndBattle) => {
                if let Some(engine) = battle.take() {
                    sheet.finish_battle(engine);
                }
            }
            Ok(Step::Render) => {}
            Err(e) => {
                writeln!(out, "error: {:#}", e)?;
                continue;
            }
        }

        let log = match battle.as_ref() {
            Some(engine) => engine.render_log(reverse),
            None => sheet.render_log(reverse),
        };
        write!(out, "{}", log)?;
        writeln!(out, "---")?;
    }
    out.flush()?;
    Ok(())
}

fn sheet_command(
    sheet: &mut CharacterSheet,
    cmd: &str,
    rest: &[&str],
    rng: &mut Dice,
) -> anyhow::Result<Step> {
    match cmd {
        "stat" => {
            let (key, delta) = parse_change(rest)?;
            sheet.change_stat_named(key, delta)?;
        }
        "eat" => sheet.eat_ration(),
        "luck" => {
            sheet.roll_luck(rng);
        }
        "reroll" => sheet.reroll_stats(rng),
        "name" => {
            sheet.set_name(rest.join(" "));
            return Ok(Step::Quiet);
        }
        "potion" => {
            sheet.set_potion(rest.join(" "));
            return Ok(Step::Quiet);
        }
        "clear-potion" => sheet.clear_potion(),
        "clear" => sheet.logbook_mut().clear(),
        "battle" => return Ok(Step::StartBattle(parse_enemy(sheet.rules(), rest)?)),
        "fight" | "enemy" | "end" => bail!("'{}' only works during a battle", cmd),
        _ => bail!("unknown command '{}', try 'help'", cmd),
    }
    Ok(Step::Render)
}

fn battle_command(
    engine: &mut CombatEngine,
    cmd: &str,
    rest: &[&str],
    rng: &mut Dice,
) -> anyhow::Result<Step> {
    match cmd {
        "fight" => {
            engine.fight_round(rng);
        }
        "luck" => {
            engine.roll_luck_check(rng);
        }
        "stat" => {
            let (key, delta) = parse_change(rest)?;
            engine.change_stat_named(Side::Player, key, delta)?;
        }
        "enemy" => {
            let (key, delta) = parse_change(rest)?;
            engine.change_stat_named(Side::Enemy, key, delta)?;
        }
        "clear" => engine.logbook_mut().clear(),
        "end" => return Ok(Step::EndBattle),
        "battle" | "eat" | "reroll" | "name" | "potion" | "clear-potion" => {
            bail!("'{}' is not available during a battle", cmd)
        }
        _ => bail!("unknown command '{}', try 'help'", cmd),
    }
    Ok(Step::Render)
}

fn parse_change<'a>(args: &[&'a str]) -> anyhow::Result<(&'a str, i32)> {
    match args {
        [key, delta] => {
            let delta: i32 = delta
                .parse()
                .with_context(|| format!("'{}' is not a whole number", delta))?;
            Ok((*key, delta))
        }
        _ => bail!("expected <key> <delta>"),
    }
}

fn parse_enemy(rules: &Rules, args: &[&str]) -> anyhow::Result<Option<Character>> {
    match args {
        [] => Ok(None),
        [skill, stamina, name @ ..] => {
            let skill: i32 = skill.parse().context("enemy skill must be a whole number")?;
            let stamina: i32 = stamina
                .parse()
                .context("enemy stamina must be a whole number")?;
            let name = if name.is_empty() {
                None
            } else {
                Some(name.join(" "))
            };
            Ok(build_enemy(rules, name, Some(skill), Some(stamina)))
        }
        _ => bail!("expected: battle [skill stamina [name]]"),
    }
}

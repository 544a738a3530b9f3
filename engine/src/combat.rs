//! One fight between the player and a single enemy.
//!
//! A round compares attack values (2d6 + skill each); the loser takes
//! `std_dmg` stamina damage. After a decisive round the player may test their
//! luck once to shift that damage by `change_on_luck`. The engine keeps the
//! outcome of the last round for exactly that purpose and forgets it as soon
//! as a luck check has been processed.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Character, EngineError, Log, LogKind, Logbook, Roller, Rules, Stat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    PlayerWin,
    EnemyWin,
    Draw,
}

/// What the next luck check will act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LastRound {
    #[default]
    Idle,
    Resolved(RoundOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRoll {
    pub first: i32,
    pub second: i32,
    pub skill: i32,
}

impl AttackRoll {
    pub fn dice_total(&self) -> i32 {
        self.first + self.second
    }

    pub fn value(&self) -> i32 {
        self.dice_total() + self.skill
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub outcome: RoundOutcome,
    pub player_attack: AttackRoll,
    pub enemy_attack: AttackRoll,
    /// Stamina lost by the losing side; zero on a draw.
    pub damage: i32,
    /// Entries added to the logbook, in order.
    pub logs: Vec<Log>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LuckAdjustment {
    /// The enemy lost extra stamina.
    EnemyTookMore(i32),
    /// The player got stamina back.
    PlayerTookLess(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LuckOutcome {
    NoFight,
    AfterDraw,
    Lucky {
        roll: i32,
        adjustment: LuckAdjustment,
    },
    Unlucky {
        roll: i32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckReport {
    pub outcome: LuckOutcome,
    pub logs: Vec<Log>,
}

pub struct CombatEngine {
    player: Character,
    enemy: Character,
    last_round: LastRound,
    logbook: Logbook,
    rules: Rules,
}

impl CombatEngine {
    /// Without an enemy, a default one is made from the rules.
    pub fn new(player: Character, enemy: Option<Character>, rules: Rules) -> Self {
        let enemy = enemy.unwrap_or_else(|| {
            Character::with_stats(rules.enemy_name.clone(), rules.default_stats, &rules)
        });
        let mut logbook = Logbook::new(&rules);
        logbook.add(Log::standard(&rules.templates, LogKind::Options, &[]));
        tracing::info!(player = %player.name, enemy = %enemy.name, "combat started");
        Self {
            player,
            enemy,
            last_round: LastRound::Idle,
            logbook,
            rules,
        }
    }

    pub fn player(&self) -> &Character {
        &self.player
    }

    pub fn enemy(&self) -> &Character {
        &self.enemy
    }

    pub fn last_round(&self) -> LastRound {
        self.last_round
    }

    pub fn logbook(&self) -> &Logbook {
        &self.logbook
    }

    pub fn logbook_mut(&mut self) -> &mut Logbook {
        &mut self.logbook
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn render_log(&self, reverse: bool) -> String {
        self.logbook.render(reverse)
    }

    /// Ends the fight, handing the (possibly wounded) player back.
    pub fn into_player(self) -> Character {
        self.player
    }

    pub fn fight_round(&mut self, dice: &mut impl Roller) -> RoundReport {
        let player_attack = roll_attack(dice, &self.player);
        let enemy_attack = roll_attack(dice, &self.enemy);
        let player_line = self.attack_log(&self.player.name, player_attack);
        let enemy_line = self.attack_log(&self.enemy.name, enemy_attack);

        let std_dmg = self.rules.std_dmg;
        let (outcome, damage, result) = match player_attack.value().cmp(&enemy_attack.value()) {
            std::cmp::Ordering::Greater => {
                self.change_stat_sle(Side::Enemy, Stat::Stamina, -std_dmg);
                let log = self.log(LogKind::TakeDmg, &[&self.enemy.name, &std_dmg]);
                (RoundOutcome::PlayerWin, std_dmg, log)
            }
            std::cmp::Ordering::Less => {
                self.change_stat_sle(Side::Player, Stat::Stamina, -std_dmg);
                let log = self.log(LogKind::TakeDmg, &[&self.player.name, &std_dmg]);
                (RoundOutcome::EnemyWin, std_dmg, log)
            }
            std::cmp::Ordering::Equal => (RoundOutcome::Draw, 0, self.log(LogKind::Draw, &[])),
        };
        self.last_round = LastRound::Resolved(outcome);

        let logs = vec![self.log(LogKind::Space, &[]), result, enemy_line, player_line];
        self.logbook.extend(logs.iter().cloned());

        tracing::info!(
            ?outcome,
            player_attack = player_attack.value(),
            enemy_attack = enemy_attack.value(),
            damage,
            "round resolved"
        );

        RoundReport {
            outcome,
            player_attack,
            enemy_attack,
            damage,
            logs,
        }
    }

    /// Test the player's luck against the last round. Only meaningful after a
    /// decisive round; otherwise an explanatory entry is logged instead.
    /// Either way the engine is idle afterwards.
    pub fn roll_luck_check(&mut self, dice: &mut impl Roller) -> LuckReport {
        let previous = std::mem::take(&mut self.last_round);
        let round_winner = match previous {
            LastRound::Idle => {
                tracing::warn!("luck check requested before any round");
                let log = self.log(LogKind::ErrNoFight, &[]);
                return self.finish_luck(LuckOutcome::NoFight, vec![log]);
            }
            LastRound::Resolved(RoundOutcome::Draw) => {
                tracing::warn!("luck check requested after a draw");
                let log = self.log(LogKind::ErrDraw, &[]);
                return self.finish_luck(LuckOutcome::AfterDraw, vec![log]);
            }
            LastRound::Resolved(RoundOutcome::PlayerWin) => Side::Player,
            LastRound::Resolved(RoundOutcome::EnemyWin) => Side::Enemy,
        };

        let mut logs = vec![self.log(LogKind::Space, &[])];
        let roll = dice.roll(2, 6);
        let luck = self.player.stat(Stat::Luck);
        let result = if roll <= luck {
            self.change_stat_sle(Side::Player, Stat::Luck, -1);
            logs.push(self.stat_log(Stat::Luck, -1));
            logs.push(self.log(LogKind::Success, &[]));
            let amount = self.rules.change_on_luck;
            let adjustment = match round_winner {
                Side::Enemy => {
                    self.change_stat_sle(Side::Enemy, Stat::Stamina, -amount);
                    logs.push(self.log(LogKind::MoreDmg, &[&self.enemy.name, &amount]));
                    LuckAdjustment::EnemyTookMore(amount)
                }
                Side::Player => {
                    self.change_stat_sle(Side::Player, Stat::Stamina, amount);
                    logs.push(self.log(LogKind::LessDmg, &[&self.player.name, &amount]));
                    LuckAdjustment::PlayerTookLess(amount)
                }
            };
            LuckOutcome::Lucky { roll, adjustment }
        } else {
            logs.push(self.log(LogKind::Unchanged, &[&Stat::Luck.title()]));
            logs.push(self.log(LogKind::Failure, &[]));
            LuckOutcome::Unlucky { roll }
        };
        logs.push(self.log(LogKind::RollLuck, &[&self.player.name, &roll]));

        tracing::info!(roll, luck, ?result, "luck checked");
        self.finish_luck(result, logs)
    }

    /// Manual edit of either side's stat, logged as a rise or a drop.
    pub fn change_stat(&mut self, side: Side, stat: Stat, delta: i32) -> Log {
        self.change_stat_sle(side, stat, delta);
        let log = self.stat_log(stat, delta);
        self.logbook.add(log.clone());
        log
    }

    pub fn change_stat_named(
        &mut self,
        side: Side,
        key: &str,
        delta: i32,
    ) -> Result<Log, EngineError> {
        let stat: Stat = key.parse()?;
        Ok(self.change_stat(side, stat, delta))
    }

    /// Stat change without a logbook entry ("suppress log entry").
    fn change_stat_sle(&mut self, side: Side, stat: Stat, delta: i32) -> i32 {
        match side {
            Side::Player => self.player.change_stat(stat, delta),
            Side::Enemy => self.enemy.change_stat(stat, delta),
        }
    }

    fn finish_luck(&mut self, outcome: LuckOutcome, logs: Vec<Log>) -> LuckReport {
        self.last_round = LastRound::Idle;
        self.logbook.extend(logs.iter().cloned());
        LuckReport { outcome, logs }
    }

    fn stat_log(&self, stat: Stat, delta: i32) -> Log {
        stat_change_log(&self.rules, stat, delta)
    }

    fn log(&self, kind: LogKind, args: &[&dyn Display]) -> Log {
        Log::standard(&self.rules.templates, kind, args)
    }

    /// "Hero rolled a 3 and a 4, totalling 7, for an attack value of 13."
    fn attack_log(&self, name: &str, attack: AttackRoll) -> Log {
        self.log(LogKind::RollDie, &[&name, &attack.first])
            .append_log(&self.log(LogKind::RollDieExt, &[&attack.second]))
            .append_log(&self.log(LogKind::TotalRoll, &[&attack.dice_total()]))
            .append_log(&self.log(LogKind::AttackVal, &[&attack.value()]))
    }
}

fn roll_attack(dice: &mut impl Roller, fighter: &Character) -> AttackRoll {
    let first = dice.roll(1, 6);
    let second = dice.roll(1, 6);
    let attack = AttackRoll {
        first,
        second,
        skill: fighter.stat(Stat::Skill),
    };
    tracing::debug!(name = %fighter.name, first, second, value = attack.value(), "attack rolled");
    attack
}

/// "Luck reduced by 1." / "Stamina increased by 4."
pub(crate) fn stat_change_log(rules: &Rules, stat: Stat, delta: i32) -> Log {
    if delta >= 0 {
        Log::standard(&rules.templates, LogKind::StatUp, &[&stat.title(), &delta])
    } else {
        Log::standard(&rules.templates, LogKind::StatDown, &[&stat.title(), &-delta])
    }
}

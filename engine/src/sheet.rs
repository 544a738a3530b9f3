use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::combat::stat_change_log;
use crate::{Character, CombatEngine, EngineError, Log, LogKind, Logbook, Roller, Rules, Stat};

/// Result of a luck test made from the character sheet, outside combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckRoll {
    pub roll: i32,
    pub luck: i32,
    pub success: bool,
}

/// Character sheet session: one character, its logbook, and the rules.
pub struct CharacterSheet {
    character: Character,
    logbook: Logbook,
    rules: Rules,
}

impl CharacterSheet {
    pub fn new(character: Character, rules: Rules) -> Self {
        let logbook = Logbook::new(&rules);
        Self {
            character,
            logbook,
            rules,
        }
    }

    pub fn character(&self) -> &Character {
        &self.character
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

    pub fn change_stat(&mut self, stat: Stat, delta: i32) -> i32 {
        let value = self.character.change_stat(stat, delta);
        self.logbook.add(stat_change_log(&self.rules, stat, delta));
        value
    }

    pub fn change_stat_named(&mut self, key: &str, delta: i32) -> Result<i32, EngineError> {
        let stat: Stat = key.parse()?;
        Ok(self.change_stat(stat, delta))
    }

    /// One ration for `ration_restores` stamina. Nothing stops rations going
    /// below zero.
    pub fn eat_ration(&mut self) {
        let restores = self.rules.ration_restores;
        self.push(LogKind::Space, &[]);
        self.change_stat(Stat::Stamina, restores);
        self.change_stat(Stat::Rations, -1);
        let log = self.log(LogKind::Eat, &[&self.character.name, &restores]);
        self.logbook.add(log);
    }

    pub fn roll_luck(&mut self, dice: &mut impl Roller) -> LuckRoll {
        let roll = dice.roll(2, 6);
        let luck = self.character.stat(Stat::Luck);
        let success = roll <= luck;
        self.push(LogKind::Space, &[]);
        if success {
            self.change_stat(Stat::Luck, -1);
            self.push(LogKind::Success, &[]);
        } else {
            self.push(LogKind::Unchanged, &[&Stat::Luck.title()]);
            self.push(LogKind::Failure, &[]);
        }
        let log = self.log(LogKind::RollLuck, &[&self.character.name, &roll]);
        self.logbook.add(log);
        tracing::info!(roll, luck, success, "luck tested");
        LuckRoll {
            roll,
            luck,
            success,
        }
    }

    pub fn reroll_stats(&mut self, dice: &mut impl Roller) {
        self.character.roll_stats(dice);
        self.push(LogKind::NewStats, &[]);
    }

    pub fn clear_potion(&mut self) {
        self.character.potion.clear();
        self.push(LogKind::ClearPot, &[]);
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.character.name = name.into();
    }

    pub fn set_potion(&mut self, potion: impl Into<String>) {
        self.character.potion = potion.into();
    }

    pub fn set_inventory(&mut self, inventory: impl Into<String>) {
        self.character.inventory = inventory.into();
    }

    /// Hands a copy of the character to a new fight. The sheet keeps its own
    /// copy until [`CharacterSheet::finish_battle`] brings the fighter back.
    pub fn start_battle(&self, enemy: Option<Character>) -> CombatEngine {
        CombatEngine::new(self.character.clone(), enemy, self.rules.clone())
    }

    pub fn finish_battle(&mut self, engine: CombatEngine) {
        self.character = engine.into_player();
        self.push(LogKind::Space, &[]);
        self.push(LogKind::Refresh, &[]);
        let log = self.log(LogKind::Battle, &[&self.character.name]);
        self.logbook.add(log);
    }

    fn log(&self, kind: LogKind, args: &[&dyn Display]) -> Log {
        Log::standard(&self.rules.templates, kind, args)
    }

    fn push(&mut self, kind: LogKind, args: &[&dyn Display]) {
        let log = self.log(kind, args);
        self.logbook.add(log);
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{EngineError, Roller, Rules};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Skill,
    Luck,
    Stamina,
    Rations,
}

impl Stat {
    pub const ALL: [Stat; 4] = [Stat::Skill, Stat::Luck, Stat::Stamina, Stat::Rations];

    pub fn key(self) -> &'static str {
        match self {
            Stat::Skill => "skill",
            Stat::Luck => "luck",
            Stat::Stamina => "stamina",
            Stat::Rations => "rations",
        }
    }

    /// Label used in log text, e.g. "Luck reduced by 1."
    pub fn title(self) -> &'static str {
        match self {
            Stat::Skill => "Skill",
            Stat::Luck => "Luck",
            Stat::Stamina => "Stamina",
            Stat::Rations => "Rations",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Stat {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skill" => Ok(Stat::Skill),
            "luck" => Ok(Stat::Luck),
            "stamina" => Ok(Stat::Stamina),
            "rations" => Ok(Stat::Rations),
            _ => Err(EngineError::UnknownStat(s.to_string())),
        }
    }
}

/// The four tracked numbers. No bounds: values may go negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub skill: i32,
    pub luck: i32,
    pub stamina: i32,
    pub rations: i32,
}

impl Stats {
    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Skill => self.skill,
            Stat::Luck => self.luck,
            Stat::Stamina => self.stamina,
            Stat::Rations => self.rations,
        }
    }

    fn slot(&mut self, stat: Stat) -> &mut i32 {
        match stat {
            Stat::Skill => &mut self.skill,
            Stat::Luck => &mut self.luck,
            Stat::Stamina => &mut self.stamina,
            Stat::Rations => &mut self.rations,
        }
    }

    /// Add `delta` and return the new value.
    pub fn change(&mut self, stat: Stat, delta: i32) -> i32 {
        let slot = self.slot(stat);
        *slot = slot.wrapping_add(delta);
        *slot
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub stats: Stats,
    #[serde(default)]
    pub potion: String,
    #[serde(default)]
    pub inventory: String,
}

impl Character {
    pub fn new(rules: &Rules) -> Self {
        Self::with_stats(rules.default_name.clone(), rules.default_stats, rules)
    }

    pub fn with_stats(name: impl Into<String>, stats: Stats, rules: &Rules) -> Self {
        Self {
            name: name.into(),
            stats,
            potion: String::new(),
            inventory: rules.inventory_text.clone(),
        }
    }

    pub fn rolled(name: impl Into<String>, rules: &Rules, dice: &mut impl Roller) -> Self {
        let mut character = Self::with_stats(name, rules.default_stats, rules);
        character.roll_stats(dice);
        character
    }

    /// Fresh skill (1d6+6), luck (1d6+6) and stamina (2d6+12). Rations and
    /// items are kept.
    pub fn roll_stats(&mut self, dice: &mut impl Roller) {
        self.stats.skill = dice.roll(1, 6) + 6;
        self.stats.luck = dice.roll(1, 6) + 6;
        self.stats.stamina = dice.roll(2, 6) + 12;
        tracing::debug!(
            name = %self.name,
            skill = self.stats.skill,
            luck = self.stats.luck,
            stamina = self.stats.stamina,
            "rolled stats"
        );
    }

    pub fn change_stat(&mut self, stat: Stat, delta: i32) -> i32 {
        let value = self.stats.change(stat, delta);
        tracing::debug!(name = %self.name, %stat, delta, value, "stat changed");
        value
    }

    pub fn change_stat_named(&mut self, key: &str, delta: i32) -> Result<i32, EngineError> {
        let stat: Stat = key.parse()?;
        Ok(self.change_stat(stat, delta))
    }

    pub fn stat(&self, stat: Stat) -> i32 {
        self.stats.get(stat)
    }

    /// Stamina at or below zero. Nothing in the engine acts on this.
    pub fn is_defeated(&self) -> bool {
        self.stats.stamina <= 0
    }
}

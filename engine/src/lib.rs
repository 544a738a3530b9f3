use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod character;
pub mod combat;
pub mod content;
pub mod error;
pub mod log;
pub mod logbook;
pub mod rules;
pub mod sheet;

pub use character::{Character, Stat, Stats};
pub use combat::{
    AttackRoll, CombatEngine, LastRound, LuckAdjustment, LuckOutcome, LuckReport, RoundOutcome,
    RoundReport, Side,
};
pub use error::EngineError;
pub use log::{Log, LogKind, LogTemplates};
pub use logbook::Logbook;
pub use rules::{read_text_auto, Rules};
pub use sheet::{CharacterSheet, LuckRoll};

/// Source of dice throws. Everything in the engine that needs randomness
/// takes one of these, so tests can force the numbers.
pub trait Roller {
    /// One throw of `dice` dice with `sides` sides, as a single value.
    fn roll(&mut self, dice: u32, sides: u32) -> i32;
}

pub struct Dice {
    rng: ChaCha8Rng,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl Roller for Dice {
    /// Uniform over `[dice, dice * sides]`. This is one draw across the whole
    /// range, not a sum of `dice` separate throws, so 2d6 gives 2 as often
    /// as 7. Bounds past `i32::MAX` saturate.
    fn roll(&mut self, dice: u32, sides: u32) -> i32 {
        let low = saturating_i32(dice);
        let high = saturating_i32(dice.saturating_mul(sides)).max(low);
        self.rng.gen_range(low..=high)
    }
}

/// Replays a fixed list of throws in order, starting over when it runs out.
/// An empty script always throws the lowest value of the requested range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    values: Vec<i32>,
    next: usize,
}

impl ScriptedRolls {
    pub fn new(values: impl Into<Vec<i32>>) -> Self {
        Self {
            values: values.into(),
            next: 0,
        }
    }

    /// Throws handed out so far.
    pub fn consumed(&self) -> usize {
        self.next
    }
}

impl Roller for ScriptedRolls {
    fn roll(&mut self, dice: u32, _sides: u32) -> i32 {
        if self.values.is_empty() {
            return saturating_i32(dice);
        }
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}

impl<R: Roller + ?Sized> Roller for &mut R {
    fn roll(&mut self, dice: u32, sides: u32) -> i32 {
        (**self).roll(dice, sides)
    }
}

fn saturating_i32(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

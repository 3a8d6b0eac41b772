//! Dice, rolled pools, and the sources that produce face values.
//!
//! Supports the dice Sphera actually uses (d3, d20, d100, d200) plus custom
//! dice for generic `XdY` rolls. Rolled dice are tagged as kept or dropped
//! for keep-highest/keep-lowest rules, and as base or exploded for the
//! exploding-die rule.

pub mod notation;
pub mod pool;
pub mod roll;

pub use notation::DiceNotation;
pub use pool::{DicePool, Keep, Origin, RolledDie};
pub use roll::{
    DieSource, FixedSource, RngSource, SAFETY_CAP, ScriptedSource, roll_exploding, roll_keep,
    roll_plain,
};

use serde::Serialize;

/// Faces of a die. Sphera uses d3, d20, d100 and d200; generic `XdY` rolls
/// may ask for anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Die {
    /// d3, rolled by Snipe.
    D3,
    /// d6.
    D6,
    /// d20, the exploding die.
    D20,
    /// d100, the crit die.
    D100,
    /// d200, rolled by Reckless Attack.
    D200,
    /// Any other face count.
    Custom(u32),
}

impl Die {
    /// Face count.
    pub fn sides(self) -> u32 {
        match self {
            Self::D3 => 3,
            Self::D6 => 6,
            Self::D20 => 20,
            Self::D100 => 100,
            Self::D200 => 200,
            Self::Custom(n) => n,
        }
    }

    /// The die with `sides` faces, preferring the named variants.
    pub fn with_sides(sides: u32) -> Self {
        match sides {
            3 => Self::D3,
            6 => Self::D6,
            20 => Self::D20,
            100 => Self::D100,
            200 => Self::D200,
            n => Self::Custom(n),
        }
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_dice_round_trip_through_face_count() {
        for die in [Die::D3, Die::D6, Die::D20, Die::D100, Die::D200] {
            assert_eq!(Die::with_sides(die.sides()), die);
        }
    }

    #[test]
    fn odd_face_counts_are_custom() {
        let die = Die::with_sides(7);
        assert_eq!(die, Die::Custom(7));
        assert_eq!(die.sides(), 7);
    }

    #[test]
    fn renders_as_d_notation() {
        assert_eq!(Die::D200.to_string(), "d200");
        assert_eq!(Die::Custom(12).to_string(), "d12");
    }
}

//! Generic `XdY` dice notation.

use std::str::FromStr;

use serde::Serialize;

use super::{DicePool, Die, DieSource, roll_plain};
use crate::error::EngineError;

/// Largest number of dice a generic roll may ask for.
pub const MAX_DICE: usize = 100;
/// Largest die a generic roll may ask for.
pub const MAX_FACES: u32 = 1000;

/// A parsed `XdY` expression such as `2d6` or `1d100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiceNotation {
    /// How many dice to roll.
    pub count: usize,
    /// Which die to roll.
    pub die: Die,
}

impl DiceNotation {
    /// Roll the expression with every die kept.
    pub fn roll(&self, source: &mut dyn DieSource) -> DicePool {
        roll_plain(self.die, self.count, source)
    }
}

impl FromStr for DiceNotation {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_lowercase();
        let invalid = || EngineError::InvalidDiceNotation(s.trim().to_string());

        let (count, faces) = raw.split_once('d').ok_or_else(invalid)?;
        let count: usize = count.parse().map_err(|_| invalid())?;
        let faces: u32 = faces.parse().map_err(|_| invalid())?;

        if !(1..=MAX_DICE).contains(&count) || !(2..=MAX_FACES).contains(&faces) {
            return Err(invalid());
        }

        Ok(Self {
            count,
            die: Die::with_sides(faces),
        })
    }
}

impl std::fmt::Display for DiceNotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.count, self.die)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::FixedSource;

    #[test]
    fn parses_common_forms() {
        let n: DiceNotation = "2d6".parse().unwrap();
        assert_eq!(n.count, 2);
        assert_eq!(n.die, Die::D6);
        let n: DiceNotation = " 1D100 ".parse().unwrap();
        assert_eq!(n.die, Die::D100);
        assert_eq!(n.to_string(), "1d100");
    }

    #[test]
    fn rejects_malformed_and_unreasonable() {
        for bad in ["d20", "2d", "20", "xdy", "0d6", "101d6", "2d1", "2d1001", "-1d6", "2d6d6"] {
            assert!(
                matches!(
                    bad.parse::<DiceNotation>(),
                    Err(EngineError::InvalidDiceNotation(_))
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn rolls_the_requested_pool() {
        let n: DiceNotation = "3d8".parse().unwrap();
        let pool = n.roll(&mut FixedSource(5));
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.total(), 15);
    }
}

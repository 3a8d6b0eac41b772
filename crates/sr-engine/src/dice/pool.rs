//! Rolled dice pools and their breakdown text.

use serde::Serialize;

use super::Die;

/// Whether a die was part of the initial pool or granted by an explosion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Origin {
    /// One of the dice the pool started with.
    Base,
    /// A bonus die granted by an earlier explosion.
    Exploded,
}

/// Which dice of a pool count toward totals and crits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Keep {
    /// Every die counts.
    #[default]
    All,
    /// Only the `n` highest dice count.
    Highest(usize),
    /// Only the `n` lowest dice count.
    Lowest(usize),
}

/// A single rolled die.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RolledDie {
    /// The value rolled (1 to die.sides()).
    pub value: u32,
    /// Whether the die is kept by the pool's keep rule.
    pub kept: bool,
    /// Whether the die was rolled initially or granted by an explosion.
    pub origin: Origin,
    /// Whether this die met the explosion threshold and granted another die.
    pub exploded: bool,
}

/// The result of rolling one pool of identical dice.
///
/// Never longer than the safety cap it was rolled with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DicePool {
    /// The type of die in this pool.
    pub die: Die,
    /// How many dice the pool started with.
    pub base_count: usize,
    /// The keep rule applied after rolling.
    pub keep: Keep,
    /// Individual results in roll order.
    pub dice: Vec<RolledDie>,
    /// True if rolling stopped because the safety cap was reached.
    pub capped: bool,
}

impl DicePool {
    /// A pool of already-known values, all kept, none exploded.
    pub fn from_values(die: Die, values: &[u32]) -> Self {
        Self {
            die,
            base_count: values.len(),
            keep: Keep::All,
            dice: values
                .iter()
                .map(|&value| RolledDie {
                    value,
                    kept: true,
                    origin: Origin::Base,
                    exploded: false,
                })
                .collect(),
            capped: false,
        }
    }

    /// Mark dice as kept or dropped according to `keep`.
    ///
    /// Ties are broken by roll order so the result is deterministic.
    pub fn apply_keep(&mut self, keep: Keep) {
        self.keep = keep;
        let mut order: Vec<usize> = (0..self.dice.len()).collect();
        let n = match keep {
            Keep::All => {
                self.dice.iter_mut().for_each(|d| d.kept = true);
                return;
            }
            Keep::Highest(n) => {
                order.sort_by_key(|&i| std::cmp::Reverse(self.dice[i].value));
                n
            }
            Keep::Lowest(n) => {
                order.sort_by_key(|&i| self.dice[i].value);
                n
            }
        };
        for (position, &index) in order.iter().enumerate() {
            self.dice[index].kept = position < n;
        }
    }

    /// Values of the kept dice, in roll order.
    pub fn kept_values(&self) -> Vec<u32> {
        self.dice
            .iter()
            .filter(|d| d.kept)
            .map(|d| d.value)
            .collect()
    }

    /// Values of the dropped dice, in roll order.
    pub fn dropped_values(&self) -> Vec<u32> {
        self.dice
            .iter()
            .filter(|d| !d.kept)
            .map(|d| d.value)
            .collect()
    }

    /// Sum of the kept dice.
    pub fn total(&self) -> i64 {
        self.dice
            .iter()
            .filter(|d| d.kept)
            .map(|d| i64::from(d.value))
            .sum()
    }

    /// Number of dice that triggered an explosion.
    pub fn explosions(&self) -> usize {
        self.dice.iter().filter(|d| d.exploded).count()
    }

    /// Number of dice in the pool, kept or not.
    pub fn len(&self) -> usize {
        self.dice.len()
    }

    /// Returns true if nothing was rolled.
    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    /// The notation part of the breakdown, e.g. `12d20+3` or `2d100kh1`.
    pub fn notation(&self) -> String {
        let mut s = format!("{}{}", self.base_count, self.die);
        match self.keep {
            Keep::All => {}
            Keep::Highest(n) => s.push_str(&format!("kh{n}")),
            Keep::Lowest(n) => s.push_str(&format!("kl{n}")),
        }
        let extras = self.dice.len().saturating_sub(self.base_count);
        if extras > 0 {
            s.push_str(&format!("+{extras}"));
        }
        s
    }
}

impl std::fmt::Display for DicePool {
    /// Renders `7d20+1 (17⋅EX, 4, …)` or `2d100kh1 (12, 86⋅KP)`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let marks_kept = self.keep != Keep::All;
        let values: Vec<String> = self
            .dice
            .iter()
            .map(|d| {
                let mut v = d.value.to_string();
                if d.exploded {
                    v.push_str("⋅EX");
                }
                if marks_kept && d.kept {
                    v.push_str("⋅KP");
                }
                v
            })
            .collect();
        write!(f, "{} ({})", self.notation(), values.join(", "))
    }
}

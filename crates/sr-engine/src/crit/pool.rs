//! Crit-eligible dice and how their faces count.

use serde::Serialize;

use crate::dice::DicePool;

/// Which faces of a die count as maxima or minima.
///
/// A face may count as more than one maximum; a d200 showing 200 is worth
/// two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CritFaces {
    /// `(face, weight)` pairs that count toward the maximum tally.
    pub maxima: &'static [(u32, u32)],
    /// The face that counts as a minimum, if any.
    pub minimum: Option<u32>,
}

impl CritFaces {
    /// Percentile dice: 100 is a maximum, 1 a minimum.
    pub const PERCENTILE: Self = Self {
        maxima: &[(100, 1)],
        minimum: Some(1),
    };

    /// The reckless d200: 200 is two maxima, 100 is one, 1 is a minimum.
    pub const D200: Self = Self {
        maxima: &[(200, 2), (100, 1)],
        minimum: Some(1),
    };

    fn max_weight(&self, value: u32) -> u32 {
        self.maxima
            .iter()
            .find(|(face, _)| *face == value)
            .map_or(0, |(_, weight)| *weight)
    }
}

/// Tallies of extreme faces across every crit-eligible die.
///
/// Only kept dice are ever added, so dropped dice cannot influence a tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CritPool {
    /// Number of maximum faces, weighted.
    pub maxima: u32,
    /// Number of minimum faces.
    pub minima: u32,
    /// Highest kept value seen, used by near-crit rules.
    pub highest: u32,
}

impl CritPool {
    /// An empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one die value.
    pub fn add_value(&mut self, value: u32, faces: CritFaces) {
        self.maxima += faces.max_weight(value);
        if faces.minimum == Some(value) {
            self.minima += 1;
        }
        self.highest = self.highest.max(value);
    }

    /// Add every kept die of `pool`.
    pub fn add_pool(&mut self, pool: &DicePool, faces: CritFaces) {
        for value in pool.kept_values() {
            self.add_value(value, faces);
        }
    }

    /// Build from raw values sharing one face rule.
    pub fn from_values(values: &[u32], faces: CritFaces) -> Self {
        let mut pool = Self::new();
        for &value in values {
            pool.add_value(value, faces);
        }
        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{Die, Keep};

    #[test]
    fn percentile_counts() {
        let pool = CritPool::from_values(&[100, 1, 50, 1], CritFaces::PERCENTILE);
        assert_eq!(pool.maxima, 1);
        assert_eq!(pool.minima, 2);
        assert_eq!(pool.highest, 100);
    }

    #[test]
    fn d200_double_maximum() {
        let pool = CritPool::from_values(&[200], CritFaces::D200);
        assert_eq!(pool.maxima, 2);
        let pool = CritPool::from_values(&[100], CritFaces::D200);
        assert_eq!(pool.maxima, 1);
        let pool = CritPool::from_values(&[150], CritFaces::D200);
        assert_eq!(pool.maxima, 0);
    }

    #[test]
    fn dropped_dice_are_ignored() {
        let mut dice = DicePool::from_values(Die::D100, &[1, 60]);
        dice.apply_keep(Keep::Highest(1));
        let mut pool = CritPool::new();
        pool.add_pool(&dice, CritFaces::PERCENTILE);
        assert_eq!(pool.minima, 0);
        assert_eq!(pool.highest, 60);
    }
}

//! Random sources and the three rolling modes.
//!
//! All randomness goes through [`DieSource`], so tests and forced-roll
//! overrides plug in the same way a seeded RNG does.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Die, DicePool, Keep, Origin, RolledDie};

/// Hard upper bound on pool length for exploding rolls.
pub const SAFETY_CAP: usize = 200;

/// A uniform integer generator over `[1, faces]`.
pub trait DieSource {
    /// Roll one die with `faces` sides.
    fn roll(&mut self, faces: u32) -> u32;
}

impl<T: DieSource + ?Sized> DieSource for &mut T {
    fn roll(&mut self, faces: u32) -> u32 {
        (**self).roll(faces)
    }
}

/// Randomness backed by a seedable [`StdRng`].
#[derive(Debug, Clone)]
pub struct RngSource {
    rng: StdRng,
}

impl RngSource {
    /// A deterministic source for the given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl DieSource for RngSource {
    fn roll(&mut self, faces: u32) -> u32 {
        self.rng.random_range(1..=faces.max(1))
    }
}

/// Replays forced values first, then falls back to another source.
///
/// Forced values are clamped into `[1, faces]` of whatever die consumes them.
#[derive(Debug, Clone)]
pub struct ScriptedSource<S> {
    forced: VecDeque<u32>,
    fallback: S,
}

impl<S: DieSource> ScriptedSource<S> {
    /// Queue `forced` ahead of `fallback`.
    pub fn new(forced: impl IntoIterator<Item = u32>, fallback: S) -> Self {
        Self {
            forced: forced.into_iter().collect(),
            fallback,
        }
    }

    /// Number of forced values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.forced.len()
    }
}

impl<S: DieSource> DieSource for ScriptedSource<S> {
    fn roll(&mut self, faces: u32) -> u32 {
        match self.forced.pop_front() {
            Some(value) => value.clamp(1, faces.max(1)),
            None => self.fallback.roll(faces),
        }
    }
}

/// Always rolls the same value, clamped to the die.
#[derive(Debug, Clone, Copy)]
pub struct FixedSource(pub u32);

impl DieSource for FixedSource {
    fn roll(&mut self, faces: u32) -> u32 {
        self.0.clamp(1, faces.max(1))
    }
}

/// Roll `count` dice with every die kept.
pub fn roll_plain(die: Die, count: usize, source: &mut dyn DieSource) -> DicePool {
    let values: Vec<u32> = (0..count).map(|_| source.roll(die.sides())).collect();
    DicePool::from_values(die, &values)
}

/// Roll `count` dice and keep a subset of them.
pub fn roll_keep(die: Die, count: usize, keep: Keep, source: &mut dyn DieSource) -> DicePool {
    let mut pool = roll_plain(die, count, source);
    pool.apply_keep(keep);
    pool
}

/// Roll `count` dice where every die at or above `explode_at` grants another.
///
/// Granted dice may explode again. Rolling stops once the pool holds
/// `safety_cap` dice, in which case [`DicePool::capped`] is set.
pub fn roll_exploding(
    die: Die,
    count: usize,
    explode_at: u32,
    safety_cap: usize,
    source: &mut dyn DieSource,
) -> DicePool {
    let mut dice = Vec::with_capacity(count);
    let mut pending = count;
    while pending > 0 && dice.len() < safety_cap {
        let value = source.roll(die.sides());
        let exploded = value >= explode_at;
        dice.push(RolledDie {
            value,
            kept: true,
            origin: if dice.len() < count {
                Origin::Base
            } else {
                Origin::Exploded
            },
            exploded,
        });
        if exploded {
            pending += 1;
        }
        pending -= 1;
    }

    let capped = pending > 0;
    if capped {
        tracing::warn!(
            die = %die,
            count,
            safety_cap,
            "exploding roll hit the safety cap"
        );
    }

    DicePool {
        die,
        base_count: count,
        keep: Keep::All,
        dice,
        capped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn seeded_source_is_deterministic() {
        let mut a = RngSource::seeded(42);
        let mut b = RngSource::seeded(42);
        let left = roll_plain(Die::D100, 10, &mut a);
        let right = roll_plain(Die::D100, 10, &mut b);
        assert_eq!(left, right);
    }

    #[test]
    fn scripted_source_replays_then_falls_back() {
        let mut source = ScriptedSource::new([100, 86], FixedSource(3));
        assert_eq!(source.roll(100), 100);
        assert_eq!(source.remaining(), 1);
        assert_eq!(source.roll(100), 86);
        assert_eq!(source.roll(100), 3);
    }

    #[test]
    fn forced_values_are_clamped() {
        let mut source = ScriptedSource::new([150, 0], FixedSource(1));
        assert_eq!(source.roll(100), 100);
        assert_eq!(source.roll(20), 1);
    }

    #[test]
    fn explosions_chain() {
        let mut source = ScriptedSource::new([20, 19, 5, 3], FixedSource(1));
        let pool = roll_exploding(Die::D20, 2, 19, SAFETY_CAP, &mut source);
        assert_eq!(pool.len(), 4);
        assert_eq!(pool.explosions(), 2);
        assert_eq!(pool.dice[2].origin, Origin::Exploded);
        assert_eq!(pool.total(), 47);
        assert!(!pool.capped);
        assert_eq!(pool.to_string(), "2d20+2 (20⋅EX, 19⋅EX, 5, 3)");
    }

    #[test]
    fn always_exploding_stops_at_cap() {
        let mut source = FixedSource(20);
        let pool = roll_exploding(Die::D20, 7, 17, SAFETY_CAP, &mut source);
        assert_eq!(pool.len(), SAFETY_CAP);
        assert!(pool.capped);
    }

    #[test]
    fn keep_highest_of_two() {
        let mut source = ScriptedSource::new([12, 86], FixedSource(1));
        let pool = roll_keep(Die::D100, 2, Keep::Highest(1), &mut source);
        assert_eq!(pool.total(), 86);
        assert_eq!(pool.dropped_values(), vec![12]);
    }

    proptest! {
        #[test]
        fn exploding_pool_bounds(
            seed in any::<u64>(),
            count in 1usize..20,
            faces in 2u32..=100,
            threshold in 1u32..=120,
            cap in 20usize..=200,
        ) {
            let mut source = RngSource::seeded(seed);
            let pool = roll_exploding(Die::with_sides(faces), count, threshold, cap, &mut source);
            prop_assert!(pool.len() >= count.min(cap));
            prop_assert!(pool.len() <= cap);
            prop_assert!(pool.dice.iter().all(|d| (1..=faces).contains(&d.value)));
            if threshold > faces {
                prop_assert_eq!(pool.len(), count);
                prop_assert!(!pool.capped);
            }
        }

        #[test]
        fn keep_never_counts_dropped_dice(seed in any::<u64>(), count in 1usize..10, keep in 1usize..10) {
            let mut source = RngSource::seeded(seed);
            let pool = roll_keep(Die::D100, count, Keep::Highest(keep), &mut source);
            prop_assert_eq!(pool.kept_values().len(), keep.min(count));
            let kept_min = pool.kept_values().into_iter().min().unwrap_or(0);
            prop_assert!(pool.dropped_values().iter().all(|&d| d <= kept_min));
        }
    }
}

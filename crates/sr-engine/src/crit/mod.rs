//! Crit-tier classification.
//!
//! Tiers are decided from counts of extreme faces in a [`CritPool`], never
//! from die order. Precedence, first match wins:
//!
//! 1. two or more maxima: Star Breaker
//! 2. two or more minima and no maxima: World Ender
//! 3. at least one maximum and one minimum: Schrodinger Crit
//! 4. at least one maximum: Crit
//! 5. at least one minimum: Crit Fail
//! 6. any die at or above a near-crit threshold: Crit at the rank multiplier
//! 7. otherwise: Plain

pub mod pool;

pub use pool::{CritFaces, CritPool};

use serde::Serialize;

use crate::rank::{ByRank, Rank};

/// The outcome tier of a crit-eligible roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CritTier {
    /// No extreme faces.
    Plain,
    /// A maximum face, or a near-crit.
    Crit,
    /// A minimum face.
    CritFail,
    /// Both a maximum and a minimum face.
    SchrodingerCrit,
    /// Two or more maximum faces.
    StarBreaker,
    /// Two or more minimum faces with no maximum.
    WorldEnder,
}

impl CritTier {
    /// Short tag shown next to the headline, empty for [`CritTier::Plain`].
    pub fn tag(self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Crit => "(crit!)",
            Self::CritFail => "(crit fail...)",
            Self::SchrodingerCrit => "(schrodinger crit!)",
            Self::StarBreaker => "(STAR BREAKER)",
            Self::WorldEnder => "(WORLD ENDER)",
        }
    }

    /// Whether this tier flags a narrative event for the table.
    pub fn is_event(self) -> bool {
        matches!(
            self,
            Self::CritFail | Self::SchrodingerCrit | Self::WorldEnder
        )
    }
}

impl std::fmt::Display for CritTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Plain => "Plain",
            Self::Crit => "Crit",
            Self::CritFail => "Crit Fail",
            Self::SchrodingerCrit => "Schrodinger Crit",
            Self::StarBreaker => "Star Breaker",
            Self::WorldEnder => "World Ender",
        };
        write!(f, "{name}")
    }
}

/// A lower-precedence crit on any die at or above `threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearCrit {
    /// Lowest value that counts.
    pub threshold: u32,
    /// Multiplier by acting mastery rank.
    pub multiplier: ByRank<f64>,
}

/// Multipliers an action attaches to each tier.
///
/// Tiers without a multiplier of their own (Plain, Crit Fail, World Ender)
/// use `base`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierRules {
    /// Multiplier when no multiplying tier applies.
    pub base: f64,
    /// Multiplier for [`CritTier::Crit`].
    pub crit: f64,
    /// Multiplier for [`CritTier::SchrodingerCrit`].
    pub schrodinger: f64,
    /// Multiplier for [`CritTier::StarBreaker`].
    pub star_breaker: f64,
    /// Optional near-crit rule.
    pub near_crit: Option<NearCrit>,
}

impl TierRules {
    /// Crit and Schrodinger double, Star Breaker is ×7.
    pub const DOUBLING: Self = Self {
        base: 1.0,
        crit: 2.0,
        schrodinger: 2.0,
        star_breaker: 7.0,
        near_crit: None,
    };

    /// Critical Attack: ×3 perfect crits, ×7 Star Breaker, 85+ near crits.
    pub const CRITICAL: Self = Self {
        base: 1.2,
        crit: 3.0,
        schrodinger: 3.0,
        star_breaker: 7.0,
        near_crit: Some(NearCrit {
            threshold: 85,
            multiplier: ByRank::new([1.2, 1.5, 1.6, 1.7, 1.8, 2.0]),
        }),
    };
}

/// The tier a pool landed in and the multiplier it carries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    /// The winning tier.
    pub tier: CritTier,
    /// Multiplier applied after summing.
    pub multiplier: f64,
    /// True when the crit came from the near-crit rule.
    pub near_crit: bool,
}

/// Assign exactly one tier to `pool`.
pub fn classify(pool: &CritPool, rules: &TierRules, rank: Rank) -> Classification {
    let (tier, multiplier) = if pool.maxima >= 2 {
        (CritTier::StarBreaker, rules.star_breaker)
    } else if pool.minima >= 2 && pool.maxima == 0 {
        (CritTier::WorldEnder, rules.base)
    } else if pool.maxima >= 1 && pool.minima >= 1 {
        (CritTier::SchrodingerCrit, rules.schrodinger)
    } else if pool.maxima >= 1 {
        (CritTier::Crit, rules.crit)
    } else if pool.minima >= 1 {
        (CritTier::CritFail, rules.base)
    } else {
        match rules.near_crit {
            Some(near) if pool.highest >= near.threshold => {
                return Classification {
                    tier: CritTier::Crit,
                    multiplier: near.multiplier.get(rank),
                    near_crit: true,
                };
            }
            _ => (CritTier::Plain, rules.base),
        }
    };

    Classification {
        tier,
        multiplier,
        near_crit: false,
    }
}

impl Classification {
    /// The rules line describing the tier, if it has one.
    pub fn note(&self, rank: Rank, near_threshold: Option<u32>) -> Option<String> {
        let m = self.multiplier;
        match self.tier {
            CritTier::Plain => None,
            CritTier::Crit if self.near_crit => Some(format!(
                "► **Crit ({}+).** Multiplier ×{m} ({rank}-ranked mastery).",
                near_threshold.unwrap_or_default()
            )),
            CritTier::Crit => Some(format!("► **Crit.** Multiplier ×{m}.")),
            CritTier::CritFail => Some("► Crit Fail: Chance for Nat1 event.".to_string()),
            CritTier::SchrodingerCrit => Some(format!(
                "► **Schrodinger Crit.** Multiplier ×{m} and chance for Nat1 event."
            )),
            CritTier::StarBreaker => Some(format!("► **STAR BREAKER.** Multiplier ×{m}.")),
            CritTier::WorldEnder => {
                Some("► **WORLD ENDER.** Chance for Nat1+ event.".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn percentile(values: &[u32]) -> CritPool {
        CritPool::from_values(values, CritFaces::PERCENTILE)
    }

    #[test]
    fn precedence_table() {
        let rules = TierRules::DOUBLING;
        let cases: &[(&[u32], CritTier)] = &[
            (&[100, 100], CritTier::StarBreaker),
            (&[100, 100, 1, 1], CritTier::StarBreaker),
            (&[1, 1], CritTier::WorldEnder),
            (&[100, 1], CritTier::SchrodingerCrit),
            (&[100, 1, 1], CritTier::SchrodingerCrit),
            (&[100, 42], CritTier::Crit),
            (&[1, 42], CritTier::CritFail),
            (&[42, 99], CritTier::Plain),
        ];
        for (values, tier) in cases {
            let c = classify(&percentile(values), &rules, Rank::B);
            assert_eq!(c.tier, *tier, "{values:?}");
        }
    }

    #[test]
    fn critical_multipliers() {
        let rules = TierRules::CRITICAL;
        let c = classify(&percentile(&[100, 100]), &rules, Rank::E);
        assert_eq!((c.tier, c.multiplier), (CritTier::StarBreaker, 7.0));
        let c = classify(&percentile(&[100, 1]), &rules, Rank::E);
        assert_eq!(c.multiplier, 3.0);
        let c = classify(&percentile(&[1, 1]), &rules, Rank::E);
        assert_eq!((c.tier, c.multiplier), (CritTier::WorldEnder, 1.2));
    }

    #[test]
    fn near_crit_is_lower_precedence() {
        let rules = TierRules::CRITICAL;
        let c = classify(&percentile(&[86, 12]), &rules, Rank::B);
        assert_eq!(c.tier, CritTier::Crit);
        assert!(c.near_crit);
        assert_eq!(c.multiplier, 1.7);

        let c = classify(&percentile(&[86, 1]), &rules, Rank::B);
        assert_eq!(c.tier, CritTier::CritFail);
        assert!(!c.near_crit);

        let c = classify(&percentile(&[84, 12]), &rules, Rank::S);
        assert_eq!(c.tier, CritTier::Plain);
    }

    #[test]
    fn d200_alone_can_star_break() {
        let pool = CritPool::from_values(&[200], CritFaces::D200);
        let c = classify(&pool, &TierRules::DOUBLING, Rank::C);
        assert_eq!(c.tier, CritTier::StarBreaker);
    }

    #[test]
    fn notes() {
        let c = classify(&percentile(&[86, 12]), &TierRules::CRITICAL, Rank::S);
        assert_eq!(
            c.note(Rank::S, Some(85)).as_deref(),
            Some("► **Crit (85+).** Multiplier ×2 (S-ranked mastery).")
        );
        let c = classify(&percentile(&[50]), &TierRules::DOUBLING, Rank::S);
        assert_eq!(c.note(Rank::S, None), None);
        assert!(CritTier::WorldEnder.is_event());
        assert!(!CritTier::StarBreaker.is_event());
    }

    proptest! {
        #[test]
        fn two_maxima_always_star_break(mut rest in proptest::collection::vec(1u32..=100, 0..6), seed in any::<usize>()) {
            rest.push(100);
            rest.insert(seed % rest.len(), 100);
            let c = classify(&percentile(&rest), &TierRules::CRITICAL, Rank::D);
            prop_assert_eq!(c.tier, CritTier::StarBreaker);
        }

        #[test]
        fn no_extremes_is_plain(values in proptest::collection::vec(2u32..=99, 1..6)) {
            let c = classify(&percentile(&values), &TierRules::DOUBLING, Rank::A);
            prop_assert_eq!(c.tier, CritTier::Plain);
            prop_assert_eq!(c.multiplier, 1.0);
        }

        #[test]
        fn order_does_not_matter(mut values in proptest::collection::vec(1u32..=100, 1..6)) {
            let before = classify(&percentile(&values), &TierRules::CRITICAL, Rank::C);
            values.reverse();
            let after = classify(&percentile(&values), &TierRules::CRITICAL, Rank::C);
            prop_assert_eq!(before, after);
        }
    }
}

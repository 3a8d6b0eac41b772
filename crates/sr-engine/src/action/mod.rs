//! Action configuration records.
//!
//! Every action is data: an [`ActionSpec`] names its ranks, gates, trigger
//! vocabulary and a [`ActionBody`]. The engine interprets these records with
//! one generic routine per body kind.

pub mod catalog;
pub mod flat;
pub mod roll;

pub use catalog::Catalog;
pub use flat::{FlatBase, FlatMode, FlatSpec, FlatStep, TargetText};
pub use roll::{PoolSpec, RankLine, RollSpec, SplitMode, SplitRule, SuccessCheck, TriggerBonus};

use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::rank::{ByRank, Rank, RankCategory, RankTable};
use crate::trigger::{ExclusiveGroup, TriggerDef, TriggerSet};

/// How the action is announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionKind {
    /// A standard action.
    Action,
    /// A special action.
    SpecialAction,
    /// A sub-action or bonus action.
    SubAction,
    /// An always-on passive.
    Passive,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Action => write!(f, "Action"),
            Self::SpecialAction => write!(f, "Special Action"),
            Self::SubAction => write!(f, "Sub-Action"),
            Self::Passive => write!(f, "Passive"),
        }
    }
}

/// Which rank arguments an action reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankUse {
    /// No rank argument.
    None,
    /// Mastery rank only.
    Mastery,
    /// Mastery rank followed by weapon rank.
    MasteryAndWeapon,
}

/// A minimum mastery rank for an action or one of its modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankGate {
    /// Name used in the error message.
    pub label: &'static str,
    /// Lowest rank allowed.
    pub minimum: Rank,
    /// Only enforced when this trigger is present.
    pub when: Option<&'static str>,
    /// Not enforced when this trigger is present.
    pub waived_by: Option<&'static str>,
}

impl RankGate {
    /// A gate on the whole action.
    pub const fn always(label: &'static str, minimum: Rank) -> Self {
        Self {
            label,
            minimum,
            when: None,
            waived_by: None,
        }
    }

    /// Check `rank` against this gate.
    pub fn check(&self, rank: Rank, triggers: &TriggerSet) -> EngineResult<()> {
        let applies = self.when.is_none_or(|t| triggers.has(t))
            && !self.waived_by.is_some_and(|t| triggers.has(t));
        if applies && rank < self.minimum {
            return Err(EngineError::RankTooLow {
                action: self.label.to_string(),
                minimum: self.minimum,
            });
        }
        Ok(())
    }
}

/// A field of the mastery rank table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankField {
    /// The flat rank value.
    Value,
    /// Counter success threshold.
    CounterCheck,
    /// Counter damage.
    CounterDmg,
}

/// A number that scales with mastery rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankValue {
    /// Same at every rank.
    Fixed(i64),
    /// Listed per rank in the action itself.
    Table(ByRank<i64>),
    /// Read from the mastery rank table.
    Field(RankField),
}

impl RankValue {
    /// Evaluate for `rank`.
    pub fn get(&self, rank: Rank, table: &RankTable) -> i64 {
        match self {
            Self::Fixed(v) => *v,
            Self::Table(t) => t.get(rank),
            Self::Field(field) => {
                let entry = table.entry(rank, RankCategory::Mastery);
                match field {
                    RankField::Value => entry.value,
                    RankField::CounterCheck => i64::from(entry.counter_check),
                    RankField::CounterDmg => entry.counter_dmg,
                }
            }
        }
    }
}

/// What an action computes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionBody {
    /// Rolls dice and sums modifiers.
    Rolled(RollSpec),
    /// Computes a rank-scaled number without a main roll.
    Flat(FlatSpec),
}

/// One action's full configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionSpec {
    /// Command word.
    pub key: &'static str,
    /// Other accepted command words.
    pub aliases: &'static [&'static str],
    /// Display title.
    pub title: &'static str,
    /// How the action is announced.
    pub kind: ActionKind,
    /// One-line description for listings.
    pub summary: &'static str,
    /// Rank arguments read.
    pub ranks: RankUse,
    /// Minimum-rank gates.
    pub gates: &'static [RankGate],
    /// Action-specific triggers.
    pub triggers: &'static [TriggerDef],
    /// Action-specific exclusive groups.
    pub groups: &'static [ExclusiveGroup],
    /// Exactly one of these triggers must be present.
    pub requires_one_of: &'static [&'static str],
    /// The computation.
    pub body: ActionBody,
}

impl ActionSpec {
    /// Whether `word` names this action.
    pub fn matches(&self, word: &str) -> bool {
        self.key.eq_ignore_ascii_case(word) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(word))
    }
}

/// Everything a body resolver needs, validated.
pub(crate) struct Context<'a> {
    pub spec: &'a ActionSpec,
    pub rank: Option<Rank>,
    pub weapon: Option<Rank>,
    pub modifiers: &'a [i64],
    pub triggers: &'a TriggerSet,
    pub ranks: &'a RankTable,
    pub safety_cap: usize,
}

/// Fill `{name}` placeholders in a rules-text template.
pub(crate) fn fill(template: &str, values: &[(&str, String)]) -> String {
    values.iter().fold(template.to_string(), |text, (key, value)| {
        text.replace(&format!("{{{key}}}"), value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::{TriggerVocabulary, parse};

    const BLITZ: TriggerDef = TriggerDef::flag("blitz", "Blitz", r"\bblitz\b");
    const FRENZY: TriggerDef = TriggerDef::flag("frenzy", "Frenzy", r"\bfrenzy\b");

    fn triggers(comment: &str) -> TriggerSet {
        let vocab = TriggerVocabulary::new(&[BLITZ, FRENZY], &[]).unwrap();
        parse(Some(comment), &vocab).unwrap()
    }

    #[test]
    fn gate_always() {
        let gate = RankGate::always("Mark", Rank::D);
        assert!(gate.check(Rank::D, &triggers("")).is_ok());
        assert_eq!(
            gate.check(Rank::E, &triggers("")),
            Err(EngineError::RankTooLow {
                action: "Mark".to_string(),
                minimum: Rank::D
            })
        );
    }

    #[test]
    fn gate_when_trigger() {
        let gate = RankGate {
            label: "Blitz",
            minimum: Rank::B,
            when: Some("blitz"),
            waived_by: None,
        };
        assert!(gate.check(Rank::C, &triggers("no mode")).is_ok());
        assert!(gate.check(Rank::C, &triggers("blitz")).is_err());
        assert!(gate.check(Rank::B, &triggers("blitz")).is_ok());
    }

    #[test]
    fn gate_waived() {
        let gate = RankGate {
            label: "Rage",
            minimum: Rank::D,
            when: None,
            waived_by: Some("frenzy"),
        };
        assert!(gate.check(Rank::E, &triggers("")).is_err());
        assert!(gate.check(Rank::E, &triggers("frenzy")).is_ok());
    }

    #[test]
    fn rank_values() {
        let table = RankTable::standard();
        assert_eq!(RankValue::Fixed(30).get(Rank::E, &table), 30);
        assert_eq!(
            RankValue::Table(ByRank::new([0, 1, 2, 3, 4, 5])).get(Rank::A, &table),
            4
        );
        assert_eq!(RankValue::Field(RankField::CounterDmg).get(Rank::C, &table), 40);
        assert_eq!(RankValue::Field(RankField::CounterCheck).get(Rank::E, &table), 40);
        assert_eq!(RankValue::Field(RankField::Value).get(Rank::S, &table), 40);
    }

    #[test]
    fn fill_placeholders() {
        let text = fill(
            "Deal **{X} damage** (MR⋅{rank})",
            &[("X", "15".to_string()), ("rank", "B".to_string())],
        );
        assert_eq!(text, "Deal **15 damage** (MR⋅B)");
    }
}

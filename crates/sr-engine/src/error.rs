//! Error types for the resolution engine.
//!
//! Every variant is a user-input problem. They are all raised before any die
//! is rolled, so a failed invocation has no partial results.

use crate::rank::{Rank, RankCategory};

/// Errors that can occur while resolving an action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The command names an action the catalog does not know.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// A rank argument was required but not given.
    #[error("missing {0} rank (expected one of E, D, C, B, A, S)")]
    MissingRank(RankCategory),

    /// A rank argument was given but is not one of E..S.
    #[error("invalid {category} rank '{input}' (expected one of E, D, C, B, A, S)")]
    InvalidRank {
        /// Which table the rank was looked up in.
        category: RankCategory,
        /// The raw token the user typed.
        input: String,
    },

    /// The action (or one of its bonus modes) is gated behind a higher rank.
    #[error("{action} is not available below Mastery Rank ({minimum})")]
    RankTooLow {
        /// Display name of the action or bonus mode.
        action: String,
        /// Lowest rank that may use it.
        minimum: Rank,
    },

    /// The action needs one trigger out of a group and none was present.
    #[error("{action} requires one of: {options}")]
    MissingTrigger {
        /// Display name of the action.
        action: String,
        /// Human-readable list of accepted triggers.
        options: String,
    },

    /// A required trigger parameter was absent.
    #[error("missing value for {trigger}; example: {example}")]
    MissingTriggerParameter {
        /// Name of the trigger.
        trigger: String,
        /// Example of the expected syntax.
        example: String,
    },

    /// A trigger matched but its parameter could not be parsed.
    #[error("invalid value for {trigger}: '{value}'; example: {example}")]
    InvalidTriggerParameter {
        /// Name of the trigger.
        trigger: String,
        /// The captured text, possibly empty.
        value: String,
        /// Example of the expected syntax.
        example: String,
    },

    /// A numeric modifier is larger than the engine accepts.
    #[error("modifier {value} is out of range (limit ±{limit})")]
    ModifierOutOfRange {
        /// The modifier as typed.
        value: i64,
        /// Largest accepted magnitude.
        limit: i64,
    },

    /// A generic `XdY` roll was malformed or out of bounds.
    #[error("invalid dice notation '{0}': use XdY with 1-100 dice and 2-1000 faces")]
    InvalidDiceNotation(String),

    /// An action specification is internally inconsistent.
    #[error("invalid action config: {0}")]
    InvalidConfig(String),
}

/// Convenience result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = EngineError::InvalidRank {
            category: RankCategory::Weapon,
            input: "z".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid weapon rank 'z' (expected one of E, D, C, B, A, S)"
        );

        let err = EngineError::RankTooLow {
            action: "Blitz".to_string(),
            minimum: Rank::B,
        };
        assert_eq!(err.to_string(), "Blitz is not available below Mastery Rank (B)");
    }
}

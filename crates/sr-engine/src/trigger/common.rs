//! Triggers shared by many actions.

use super::{Capture, ExclusiveGroup, TriggerDef, TriggerSet};

/// `NG<n>` stacking bonus. Only NG1 is enabled.
pub const NG: TriggerDef = TriggerDef {
    name: "ng",
    label: "NG",
    pattern: r"\bng(\d+)\b",
    attempt: None,
    capture: Capture::Integer,
    example: "NG1",
};

/// Passive tag, reported on attacks and supports.
pub const COMBAT_FOCUS: TriggerDef =
    TriggerDef::flag("combat_focus", "Combat Focus", r"\bcombat\s+focus\b");
/// Passive tag, reported on attacks.
pub const LETHAL: TriggerDef = TriggerDef::flag("lethal", "Lethal", r"\blethal\b");
/// Passive tag, reported on supports.
pub const BLESSED: TriggerDef = TriggerDef::flag("blessed", "Blessed", r"\bblessed\b");

/// Split a support across two targets, one charge each.
pub const SIMULCAST: TriggerDef = TriggerDef::flag("simulcast", "Simulcast", r"\bsimulcast\b");
/// Split a support across two targets.
pub const VERSATILE: TriggerDef = TriggerDef::flag("versatile", "Versatile", r"\bversatile\b");
/// Split a support across three targets.
pub const AOE: TriggerDef = TriggerDef::flag("aoe", "AoE", r"\baoe\b");

/// Converts modifiers into extra crit-eligible d100s.
pub const RISKY: TriggerDef = TriggerDef::flag("risky", "Risky", r"\brisky\b");

/// Split modes, highest precedence first.
pub const SPLIT_GROUP: ExclusiveGroup = ExclusiveGroup {
    members: &["simulcast", "versatile", "aoe"],
};

/// Bonus granted by the NG trigger.
pub const NG1_BONUS: i64 = 5;

/// Which passive tags an action reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassiveKind {
    /// Offensive actions report Combat Focus and Lethal.
    Attack,
    /// Support actions report Combat Focus and Blessed.
    Support,
}

impl PassiveKind {
    /// The trigger definitions this kind listens for.
    pub fn defs(self) -> [TriggerDef; 2] {
        match self {
            Self::Attack => [COMBAT_FOCUS, LETHAL],
            Self::Support => [COMBAT_FOCUS, BLESSED],
        }
    }
}

/// The NG contribution: a flat bonus, or a note for disabled levels.
pub fn ng_bonus(set: &TriggerSet) -> (i64, Option<String>) {
    match set.integer(NG.name) {
        None => (0, None),
        Some(1) => (NG1_BONUS, None),
        Some(level) => (0, Some(format!("► NG⋅{level} is currently disabled."))),
    }
}

/// `Using Combat Focus, Using Lethal`, or `None` when no tag is present.
pub fn passive_line(set: &TriggerSet, kind: PassiveKind) -> Option<String> {
    let tags: Vec<String> = kind
        .defs()
        .iter()
        .filter(|d| set.has(d.name))
        .map(|d| format!("Using {}", d.label))
        .collect();
    if tags.is_empty() {
        None
    } else {
        Some(tags.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::{TriggerVocabulary, parse};

    fn vocab() -> TriggerVocabulary {
        TriggerVocabulary::new(&[NG, COMBAT_FOCUS, LETHAL, BLESSED], &[]).unwrap()
    }

    #[test]
    fn ng_levels() {
        let v = vocab();
        assert_eq!(ng_bonus(&parse(Some("ng1"), &v).unwrap()), (5, None));
        assert_eq!(
            ng_bonus(&parse(Some("NG3 go"), &v).unwrap()),
            (0, Some("► NG⋅3 is currently disabled.".to_string()))
        );
        assert_eq!(ng_bonus(&parse(Some("ngx"), &v).unwrap()), (0, None));
    }

    #[test]
    fn passive_tags_by_kind() {
        let v = vocab();
        let set = parse(Some("combat focus, lethal and blessed"), &v).unwrap();
        assert_eq!(
            passive_line(&set, PassiveKind::Attack).as_deref(),
            Some("Using Combat Focus, Using Lethal")
        );
        assert_eq!(
            passive_line(&set, PassiveKind::Support).as_deref(),
            Some("Using Combat Focus, Using Blessed")
        );
        assert_eq!(passive_line(&TriggerSet::default(), PassiveKind::Attack), None);
    }
}

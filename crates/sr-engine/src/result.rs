//! The outcome of one resolved action.

use std::fmt;

use serde::Serialize;

use crate::action::ActionKind;
use crate::crit::CritTier;
use crate::dice::DicePool;
use crate::modifier::Split;

/// Everything computed for one invocation, ready to render.
///
/// Produced fresh for every request. Identical inputs and an identical
/// random source give results that compare equal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResult {
    /// Catalog key of the action, or the dice notation for generic rolls.
    pub action: String,
    /// Display title, which may reflect an active mode.
    pub title: String,
    /// How the action is announced.
    pub kind: ActionKind,
    /// Breakdown text, e.g. `2d20 (14, 14) + 25 (MR⋅B) ÷ 3`.
    pub calculation: String,
    /// Every pool rolled, in order.
    pub pools: Vec<DicePool>,
    /// Sum of kept dice across all pools.
    pub raw_dice_sum: i64,
    /// Everything added on top of the dice.
    pub applied_modifier_total: i64,
    /// Sum before the multiplier.
    pub subtotal: i64,
    /// Tier multiplier applied to the subtotal.
    pub multiplier: f64,
    /// The number reported to the player, per share when split.
    pub final_total: i64,
    /// How the total was divided, if at all.
    pub split: Option<Split>,
    /// Crit tier of the roll.
    pub tier: CritTier,
    /// Bold result line.
    pub headline: String,
    /// Passive tags in use.
    pub passive: Option<String>,
    /// Rules text, each line starting with `►` or `◦`.
    pub notes: Vec<String>,
}

impl ActionResult {
    /// Whether any pool stopped at the safety cap.
    pub fn capped(&self) -> bool {
        self.pools.iter().any(|p| p.capped)
    }
}

impl fmt::Display for ActionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.title)?;
        if !self.calculation.is_empty() {
            write!(f, "\n`{}`", self.calculation)?;
        }
        if let Some(passive) = &self.passive {
            write!(f, "\n{passive}")?;
        }
        if !self.headline.is_empty() {
            write!(f, "\n{}", self.headline)?;
        }
        for note in &self.notes {
            write!(f, "\n{note}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::Die;

    fn heal() -> ActionResult {
        ActionResult {
            action: "heal".to_string(),
            title: "Heal".to_string(),
            kind: ActionKind::Action,
            calculation: "2d20 (14, 14) + 25 (MR⋅B) + 25 (WR⋅B) + 5 (mods) ÷ 3".to_string(),
            pools: vec![DicePool::from_values(Die::D20, &[14, 14])],
            raw_dice_sum: 28,
            applied_modifier_total: 55,
            subtotal: 83,
            multiplier: 1.0,
            final_total: 27,
            split: Some(Split {
                mode: Some("AoE".to_string()),
                divisor: 3,
                per_charge: 0,
                recipients: "3 allies".to_string(),
            }),
            tier: CritTier::Plain,
            headline: "**+27 HP to 3 allies** (0 explosions!)".to_string(),
            passive: Some("Using Blessed".to_string()),
            notes: vec!["► You are healing.".to_string()],
        }
    }

    #[test]
    fn renders_reply() {
        insta::assert_snapshot!(heal().to_string(), @r"
        Action: Heal
        `2d20 (14, 14) + 25 (MR⋅B) + 25 (WR⋅B) + 5 (mods) ÷ 3`
        Using Blessed
        **+27 HP to 3 allies** (0 explosions!)
        ► You are healing.
        ");
    }

    #[test]
    fn flat_reply_skips_empty_sections() {
        let result = ActionResult {
            calculation: String::new(),
            passive: None,
            notes: Vec::new(),
            ..heal()
        };
        assert_eq!(
            result.to_string(),
            "Action: Heal\n**+27 HP to 3 allies** (0 explosions!)"
        );
        assert!(!result.capped());
    }

    #[test]
    fn serializes_to_json() {
        let json = serde_json::to_value(heal()).unwrap();
        assert_eq!(json["final_total"], 27);
        assert_eq!(json["tier"], "Plain");
        assert_eq!(json["split"]["recipients"], "3 allies");
    }
}

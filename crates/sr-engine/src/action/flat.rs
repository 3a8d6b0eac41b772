//! Flat actions: a rank-scaled or user-supplied number run through a short
//! list of steps, then dropped into rules text.

use super::{Context, RankValue, fill};
use crate::crit::CritTier;
use crate::dice::{DicePool, Die, DieSource, roll_plain};
use crate::error::{EngineError, EngineResult};
use crate::rank::{ByRank, Rank};
use crate::result::ActionResult;

/// Where the starting number comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlatBase {
    /// No number; the action is rules text only.
    None,
    /// A rank-scaled constant.
    Rank(RankValue),
    /// A numeric trigger capture, floored and clamped at zero.
    Input {
        /// Trigger name.
        trigger: &'static str,
        /// Breakdown tag.
        label: &'static str,
        /// Whether the capture must be present.
        required: bool,
        /// Text shown in place of the number when absent.
        placeholder: &'static str,
        /// Example syntax for the reminder note.
        example: &'static str,
    },
}

/// One transformation of the number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlatStep {
    /// Multiply, optionally only when a trigger is present.
    Multiply {
        /// Factor.
        factor: i64,
        /// Trigger that enables the step.
        when: Option<&'static str>,
        /// Breakdown tag.
        label: &'static str,
    },
    /// Floor-divide by a rank-scaled divisor.
    Divide {
        /// Divisor per rank.
        divisor: ByRank<i64>,
    },
    /// Cap at a rank-scaled maximum unless a trigger lifts it.
    Cap {
        /// Maximum per rank.
        cap: ByRank<i64>,
        /// Trigger that removes the cap.
        unless: Option<&'static str>,
    },
    /// Roll a die; on `succeed_at` or higher, replace the number.
    Gamble {
        /// Trigger that enables the roll.
        when: &'static str,
        /// Die rolled.
        die: Die,
        /// Lowest succeeding roll.
        succeed_at: u32,
        /// Replacement value per rank.
        table: ByRank<i64>,
        /// Note on success; `{roll}` is filled.
        success_line: &'static str,
        /// Note on failure.
        failure_line: &'static str,
    },
}

/// A text capture substituted for `{target}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetText {
    /// Trigger name.
    pub trigger: &'static str,
    /// Text used when the trigger is absent.
    pub default: &'static str,
}

/// Title and rules text for one variant of the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatMode {
    /// Trigger selecting the mode; `None` matches always.
    pub when: Option<&'static str>,
    /// Display title.
    pub title: &'static str,
    /// Lines; the first is the headline. `{X}`, `{rank}`, `{cap}` and
    /// `{target}` are filled.
    pub lines: &'static [&'static str],
}

/// Configuration of a flat action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatSpec {
    /// Starting number.
    pub base: FlatBase,
    /// Steps applied in order.
    pub steps: &'static [FlatStep],
    /// Optional target name.
    pub target: Option<TargetText>,
    /// Variants, first match wins.
    pub modes: &'static [FlatMode],
}

/// Reject missing required inputs before anything is rolled.
pub(crate) fn validate(ctx: &Context<'_>, spec: &FlatSpec) -> EngineResult<()> {
    if let FlatBase::Input {
        trigger,
        label,
        required: true,
        example,
        ..
    } = spec.base
    {
        if !ctx.triggers.has(trigger) {
            return Err(EngineError::MissingTriggerParameter {
                trigger: label.to_string(),
                example: example.to_string(),
            });
        }
    }
    Ok(())
}

/// Compute a flat action.
pub(crate) fn resolve(
    ctx: &Context<'_>,
    spec: &FlatSpec,
    source: &mut dyn DieSource,
) -> ActionResult {
    let rank = ctx.rank.unwrap_or(Rank::E);
    let mut notes = Vec::new();
    let mut pools = Vec::new();
    let mut calculation = String::new();

    let mut value = match spec.base {
        FlatBase::None => None,
        FlatBase::Rank(v) => {
            let n = v.get(rank, ctx.ranks);
            calculation = format!("{n} (MR⋅{rank})");
            Some(n)
        }
        FlatBase::Input {
            trigger,
            label,
            example,
            ..
        } => match ctx.triggers.number(trigger) {
            Some(raw) => {
                let n = (raw.floor() as i64).max(0);
                calculation = format!("{n} ({label})");
                Some(n)
            }
            None => {
                notes.push(format!(
                    "► Add `{example}` to your comment to compute this value."
                ));
                None
            }
        },
    };
    let subtotal = value.unwrap_or(0);

    let mut cap_text = String::new();
    for step in spec.steps {
        match *step {
            FlatStep::Multiply {
                factor,
                when,
                label,
            } => {
                if when.is_none_or(|t| ctx.triggers.has(t)) {
                    if let Some(v) = value.as_mut() {
                        *v = v.saturating_mul(factor);
                        calculation.push_str(&format!(" ×{factor}"));
                        if !label.is_empty() {
                            calculation.push_str(&format!(" ({label})"));
                        }
                    }
                }
            }
            FlatStep::Divide { divisor } => {
                let d = divisor.get(rank).max(1);
                if let Some(v) = value.as_mut() {
                    *v = v.div_euclid(d);
                    calculation.push_str(&format!(" ÷ {d}"));
                }
            }
            FlatStep::Cap { cap, unless } => {
                let max = cap.get(rank);
                cap_text = max.to_string();
                if !unless.is_some_and(|t| ctx.triggers.has(t)) {
                    if let Some(v) = value.as_mut() {
                        if *v > max {
                            *v = max;
                            calculation.push_str(&format!(" (max {max})"));
                        }
                    }
                }
            }
            FlatStep::Gamble {
                when,
                die,
                succeed_at,
                table,
                success_line,
                failure_line,
            } => {
                if ctx.triggers.has(when) {
                    let pool = roll_plain(die, 1, source);
                    let roll = pool.kept_values().first().copied().unwrap_or(0);
                    let line = if roll >= succeed_at {
                        value = Some(table.get(rank));
                        success_line
                    } else {
                        failure_line
                    };
                    notes.push(fill(line, &[("roll", roll.to_string())]));
                    pools.push(pool);
                }
            }
        }
    }

    let target = spec.target.map(|t| {
        ctx.triggers
            .text(t.trigger)
            .map_or_else(|| t.default.to_string(), str::to_string)
    });
    let placeholder = match spec.base {
        FlatBase::Input { placeholder, .. } => placeholder,
        _ => "0",
    };
    let values = [
        (
            "X",
            value.map_or_else(|| placeholder.to_string(), |v| v.to_string()),
        ),
        ("rank", rank.to_string()),
        ("cap", cap_text),
        ("target", target.unwrap_or_default()),
    ];

    let mode = spec
        .modes
        .iter()
        .find(|m| m.when.is_none_or(|t| ctx.triggers.has(t)));
    let (title, mut lines) = match mode {
        Some(mode) => (
            mode.title,
            mode.lines.iter().map(|l| fill(l, &values)).collect::<Vec<_>>(),
        ),
        None => (ctx.spec.title, Vec::new()),
    };
    let headline = if lines.is_empty() {
        String::new()
    } else {
        lines.remove(0)
    };
    lines.extend(notes);
    if !ctx.modifiers.is_empty() {
        let shown: Vec<String> = ctx.modifiers.iter().map(i64::to_string).collect();
        lines.push(format!(
            "► Modifiers ignored: {} does not use numeric modifiers ({}).",
            ctx.spec.title,
            shown.join(", ")
        ));
    }
    lines.extend(ctx.triggers.notes().iter().cloned());

    let final_total = value.unwrap_or(0);
    let raw_dice_sum = pools.iter().map(DicePool::total).sum();

    ActionResult {
        action: ctx.spec.key.to_string(),
        title: title.to_string(),
        kind: ctx.spec.kind,
        calculation,
        pools,
        raw_dice_sum,
        applied_modifier_total: 0,
        subtotal,
        multiplier: 1.0,
        final_total,
        split: None,
        tier: CritTier::Plain,
        headline,
        passive: None,
        notes: lines,
    }
}

//! Rolled actions: dice pools, crit tiers, and the modifier stack.

use super::{Context, RankValue, fill};
use crate::crit::{CritFaces, CritPool, CritTier, TierRules, classify};
use crate::dice::{DicePool, Die, DieSource, Keep, roll_exploding, roll_keep};
use crate::modifier::{Component, Split, render_calculation, resolve_total};
use crate::rank::{ByRank, Rank, RankCategory};
use crate::result::ActionResult;
use crate::trigger::common::{self, PassiveKind};

/// Extra d100s granted per this much converted modifier.
pub const RISKY_STEP: i64 = 40;

/// One pool of identical dice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolSpec {
    /// The die rolled.
    pub die: Die,
    /// Dice per rank; a zero count skips the pool.
    pub count: ByRank<u32>,
    /// Explosion threshold per rank.
    pub explode_at: Option<ByRank<u32>>,
    /// Which dice count.
    pub keep: Keep,
    /// How kept dice feed the crit pool, if at all.
    pub crit: Option<CritFaces>,
    /// Notes attached when a kept die shows a given face.
    pub face_notes: &'static [(u32, &'static str)],
}

impl PoolSpec {
    /// `count` plain dice at every rank.
    pub const fn plain(die: Die, count: u32, crit: Option<CritFaces>) -> Self {
        Self {
            die,
            count: ByRank::uniform(count),
            explode_at: None,
            keep: Keep::All,
            crit,
            face_notes: &[],
        }
    }
}

/// A pass/fail check on the first die with a rank-scaled bonus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuccessCheck {
    /// Breakdown tag for the bonus.
    pub label: &'static str,
    /// Lowest roll that succeeds.
    pub threshold: RankValue,
    /// Bonus on success.
    pub on_success: RankValue,
    /// Bonus on failure.
    pub on_failure: i64,
    /// Headline tag on success.
    pub success_tag: Option<&'static str>,
    /// Headline tag on failure.
    pub failure_tag: Option<&'static str>,
    /// Note on success; `{threshold}`, `{bonus}`, `{rank}` are filled.
    pub success_line: &'static str,
    /// Note on failure.
    pub failure_line: &'static str,
}

/// A flat bonus switched on by a trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerBonus {
    /// Trigger name.
    pub trigger: &'static str,
    /// Breakdown tag.
    pub label: &'static str,
    /// Amount added.
    pub value: RankValue,
    /// Note when active.
    pub active_line: Option<&'static str>,
    /// Note when inactive.
    pub inactive_line: Option<&'static str>,
}

/// A rules line with a rank-scaled number `{n}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankLine {
    /// Template text.
    pub template: &'static str,
    /// Value substituted for `{n}`.
    pub value: RankValue,
}

impl RankLine {
    /// A line with no number.
    pub const fn text(template: &'static str) -> Self {
        Self {
            template,
            value: RankValue::Fixed(0),
        }
    }
}

/// One way of dividing a total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitMode {
    /// Trigger selecting this mode; `None` for the default.
    pub trigger: Option<&'static str>,
    /// Display name of the mode.
    pub label: Option<&'static str>,
    /// Floor divisor.
    pub divisor: i64,
    /// Per-share bonus by rank.
    pub per_charge: Option<ByRank<i64>>,
    /// Who receives each share.
    pub recipients: &'static str,
}

/// Split modes in precedence order plus the fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitRule {
    /// Triggered modes.
    pub modes: &'static [SplitMode],
    /// Used when no mode trigger is present.
    pub default: SplitMode,
}

impl SplitRule {
    fn choose(&self, ctx: &Context<'_>, rank: Rank) -> Split {
        let mode = self
            .modes
            .iter()
            .find(|m| m.trigger.is_some_and(|t| ctx.triggers.has(t)))
            .unwrap_or(&self.default);
        Split {
            mode: mode.label.map(str::to_string),
            divisor: mode.divisor,
            per_charge: mode.per_charge.map_or(0, |t| t.get(rank)),
            recipients: mode.recipients.to_string(),
        }
    }
}

/// Configuration of a rolled action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollSpec {
    /// Pools rolled in order.
    pub pools: &'static [PoolSpec],
    /// Tier multipliers; `None` disables crits.
    pub tiers: Option<TierRules>,
    /// Show `×1` style multipliers even when they do nothing.
    pub show_multiplier: bool,
    /// Optional success check on the first die.
    pub success: Option<SuccessCheck>,
    /// Trigger-driven flat bonuses.
    pub bonuses: &'static [TriggerBonus],
    /// Whether `risky` converts modifiers into d100s.
    pub risky: bool,
    /// Optional split across charges or targets.
    pub split: Option<SplitRule>,
    /// Which passive tags are reported.
    pub passive: PassiveKind,
    /// Unit shown after the total, e.g. `damage` or `HP`.
    pub unit: &'static str,
    /// Static rules lines.
    pub lines: &'static [RankLine],
}

fn explosion_tag(pools: &[DicePool], spec: &RollSpec) -> Option<String> {
    if !spec.pools.iter().any(|p| p.explode_at.is_some()) {
        return None;
    }
    let n: usize = pools.iter().map(DicePool::explosions).sum();
    Some(if n == 1 {
        "(1 explosion)".to_string()
    } else {
        format!("({n} explosions!)")
    })
}

/// Roll and total a rolled action.
pub(crate) fn resolve(
    ctx: &Context<'_>,
    spec: &RollSpec,
    source: &mut dyn DieSource,
) -> ActionResult {
    let rank = ctx.rank.unwrap_or(Rank::E);
    let table = ctx.ranks;
    let mut pools = Vec::new();
    let mut crit_pool = CritPool::new();
    let mut notes = Vec::new();
    let mut face_notes = Vec::new();

    for pool_spec in spec.pools {
        let count = pool_spec.count.get(rank) as usize;
        if count == 0 {
            continue;
        }
        let pool = match pool_spec.explode_at {
            Some(at) => roll_exploding(pool_spec.die, count, at.get(rank), ctx.safety_cap, source),
            None => roll_keep(pool_spec.die, count, pool_spec.keep, source),
        };
        if let Some(faces) = pool_spec.crit {
            crit_pool.add_pool(&pool, faces);
        }
        for (face, note) in pool_spec.face_notes {
            if pool.kept_values().contains(face) {
                face_notes.push((*note).to_string());
            }
        }
        pools.push(pool);
    }

    let mods_total = ctx.modifiers.iter().fold(0i64, |a, m| a.saturating_add(*m));
    let risky_active = spec.risky && ctx.triggers.has(common::RISKY.name);
    let mut mods_component = None;
    let mut risky_note = None;
    if risky_active {
        let wanted = mods_total.max(0) / RISKY_STEP;
        let cap = i64::try_from(ctx.safety_cap).unwrap_or(i64::MAX);
        let count = wanted.min(cap);
        let remainder = mods_total.saturating_sub(count.saturating_mul(RISKY_STEP));
        if count > 0 {
            let mut pool = roll_keep(Die::D100, count as usize, Keep::All, source);
            if wanted > count {
                tracing::warn!(
                    wanted,
                    safety_cap = ctx.safety_cap,
                    "risky conversion hit the safety cap"
                );
                pool.capped = true;
            }
            crit_pool.add_pool(&pool, CritFaces::PERCENTILE);
            risky_note = Some(format!(
                "► Risky activated: converted {} into {count}d100 ({}), remainder: +{remainder}.",
                count * RISKY_STEP,
                pool.total()
            ));
            pools.push(pool);
        } else {
            risky_note = Some(format!(
                "► Risky activated: converted 0 into 0d100, remainder: +{remainder}."
            ));
        }
        if remainder != 0 {
            mods_component = Some(Component::tagged(remainder, "mods⋅R"));
        }
    } else if !ctx.modifiers.is_empty() {
        let shown: Vec<String> = ctx.modifiers.iter().map(i64::to_string).collect();
        mods_component = Some(Component::labeled(
            mods_total,
            format!("{} (mods)", shown.join(" + ")),
        ));
    }

    let mut components: Vec<Component> = pools
        .iter()
        .map(|p| Component::labeled(p.total(), p.to_string()))
        .collect();
    let raw_dice_sum: i64 = pools.iter().map(DicePool::total).sum();

    let mut success_tag = None;
    if let Some(check) = &spec.success {
        let first = pools
            .first()
            .and_then(|p| p.kept_values().first().copied())
            .unwrap_or(0);
        let threshold = check.threshold.get(rank, table);
        let success = i64::from(first) >= threshold;
        let bonus = if success {
            check.on_success.get(rank, table)
        } else {
            check.on_failure
        };
        components.push(Component::tagged(bonus, check.label));
        success_tag = if success {
            check.success_tag
        } else {
            check.failure_tag
        };
        let template = if success {
            check.success_line
        } else {
            check.failure_line
        };
        notes.push(fill(
            template,
            &[
                ("threshold", threshold.to_string()),
                ("bonus", bonus.to_string()),
                ("rank", rank.to_string()),
            ],
        ));
    }

    let mastery = table.entry(rank, RankCategory::Mastery);
    components.push(Component::tagged(mastery.value, format!("MR⋅{rank}")));
    if let Some(weapon) = ctx.weapon {
        let entry = table.entry(weapon, RankCategory::Weapon);
        components.push(Component::tagged(entry.value, format!("WR⋅{weapon}")));
    }

    for bonus in spec.bonuses {
        let active = ctx.triggers.has(bonus.trigger);
        if active {
            components.push(Component::tagged(bonus.value.get(rank, table), bonus.label));
        }
        let line = if active {
            bonus.active_line
        } else {
            bonus.inactive_line
        };
        if let Some(line) = line {
            notes.push(line.to_string());
        }
    }

    components.extend(mods_component);

    let (ng, ng_note) = common::ng_bonus(ctx.triggers);
    if ng > 0 {
        components.push(Component::tagged(ng, "NG⋅1"));
    }

    let classification = spec.tiers.map(|rules| classify(&crit_pool, &rules, rank));
    let multiplier = classification.map_or(1.0, |c| c.multiplier);
    let tier = classification.map_or(CritTier::Plain, |c| c.tier);

    let split = spec.split.map(|rule| rule.choose(ctx, rank));
    let resolution = resolve_total(&components, multiplier, split.as_ref());
    let calculation = render_calculation(
        &components,
        multiplier,
        spec.show_multiplier,
        split.as_ref(),
    );

    let mut headline = match &split {
        Some(split) => format!(
            "**+{} {} to {}**",
            resolution.total, spec.unit, split.recipients
        ),
        None => format!("**{} {}**", resolution.total, spec.unit),
    };
    let tags = [
        Some(tier.tag().to_string()).filter(|t| !t.is_empty()),
        success_tag.map(|t| format!("({t})")),
        explosion_tag(&pools, spec),
    ];
    for tag in tags.into_iter().flatten() {
        headline.push(' ');
        headline.push_str(&tag);
    }

    let mut all_notes = Vec::new();
    if let Some(c) = classification {
        let threshold = spec
            .tiers
            .and_then(|t| t.near_crit)
            .map(|n| n.threshold);
        all_notes.extend(c.note(rank, threshold));
    }
    all_notes.extend(notes);
    all_notes.extend(risky_note);
    all_notes.extend(face_notes);
    for line in spec.lines {
        all_notes.push(fill(
            line.template,
            &[
                ("n", line.value.get(rank, table).to_string()),
                ("rank", rank.to_string()),
            ],
        ));
    }
    all_notes.extend(ng_note);
    all_notes.extend(ctx.triggers.notes().iter().cloned());

    ActionResult {
        action: ctx.spec.key.to_string(),
        title: ctx.spec.title.to_string(),
        kind: ctx.spec.kind,
        calculation,
        pools,
        raw_dice_sum,
        applied_modifier_total: resolution.subtotal - raw_dice_sum,
        subtotal: resolution.subtotal,
        multiplier,
        final_total: resolution.total,
        split,
        tier,
        headline,
        passive: common::passive_line(ctx.triggers, spec.passive),
        notes: all_notes,
    }
}

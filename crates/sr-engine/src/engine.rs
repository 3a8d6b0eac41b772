//! The resolution entry point.
//!
//! [`Engine::resolve`] validates a request completely, then rolls. Every
//! user-input error surfaces before the first die is drawn from the source.

use serde::Serialize;

use crate::action::{ActionBody, ActionKind, ActionSpec, Catalog, Context, RankUse, flat, roll};
use crate::command::CommandParser;
use crate::config::EngineConfig;
use crate::crit::CritTier;
use crate::dice::{DiceNotation, DieSource, ScriptedSource};
use crate::error::{EngineError, EngineResult};
use crate::modifier::{Component, MAX_MODIFIER, render_calculation, resolve_total};
use crate::rank::{Rank, RankCategory, RankTable};
use crate::result::ActionResult;
use crate::trigger::{self, TriggerSet};

/// One action invocation, independent of any chat platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionRequest {
    /// Action word or `XdY` notation.
    pub action: String,
    /// Mastery rank letter as typed.
    pub rank: Option<String>,
    /// Weapon rank letter as typed.
    pub weapon_rank: Option<String>,
    /// Numeric modifiers.
    pub modifiers: Vec<i64>,
    /// Free-text comment holding the triggers.
    pub comment: Option<String>,
    /// Values consumed before the random source.
    pub forced_rolls: Vec<u32>,
}

impl ActionRequest {
    /// A request for `action` with nothing else set.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    /// Set the mastery rank.
    pub fn with_rank(mut self, rank: impl Into<String>) -> Self {
        self.rank = Some(rank.into());
        self
    }

    /// Set the weapon rank.
    pub fn with_weapon_rank(mut self, rank: impl Into<String>) -> Self {
        self.weapon_rank = Some(rank.into());
        self
    }

    /// Set the modifiers.
    pub fn with_modifiers(mut self, modifiers: impl Into<Vec<i64>>) -> Self {
        self.modifiers = modifiers.into();
        self
    }

    /// Set the comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Force the first rolls.
    pub fn with_forced_rolls(mut self, rolls: impl Into<Vec<u32>>) -> Self {
        self.forced_rolls = rolls.into();
        self
    }
}

/// Resolves actions against a rank table and an action catalog.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    ranks: RankTable,
    catalog: Catalog,
    parser: CommandParser,
}

impl Engine {
    /// An engine with the standard rank table and catalog.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let parser = CommandParser::new(config.prefix.clone())?;
        Ok(Self {
            config,
            ranks: RankTable::standard(),
            catalog: Catalog::standard()?,
            parser,
        })
    }

    /// Replace the rank table.
    pub fn with_ranks(mut self, ranks: RankTable) -> Self {
        self.ranks = ranks;
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The rank table in use.
    pub fn ranks(&self) -> &RankTable {
        &self.ranks
    }

    /// The action catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Parse and resolve a chat line. `Ok(None)` means the line is not a
    /// command.
    pub fn resolve_line(
        &self,
        line: &str,
        source: &mut dyn DieSource,
    ) -> EngineResult<Option<ActionResult>> {
        match self.parser.parse(line) {
            Some(args) => self.resolve(&args.into(), source).map(Some),
            None => Ok(None),
        }
    }

    /// Resolve one request.
    pub fn resolve(
        &self,
        request: &ActionRequest,
        source: &mut dyn DieSource,
    ) -> EngineResult<ActionResult> {
        let oversized = request
            .modifiers
            .iter()
            .find(|m| m.unsigned_abs() > MAX_MODIFIER.unsigned_abs());
        if let Some(&value) = oversized {
            return Err(EngineError::ModifierOutOfRange {
                value,
                limit: MAX_MODIFIER,
            });
        }
        let mut scripted = ScriptedSource::new(request.forced_rolls.iter().copied(), source);

        let mut result = match self.catalog.lookup(&request.action) {
            Some(entry) => {
                let spec = entry.spec;
                let (rank, weapon) = self.ranks_for(spec, request)?;
                let triggers = trigger::parse(request.comment.as_deref(), &entry.vocabulary)?;
                check_required(spec, &entry.vocabulary, &triggers)?;
                if let Some(rank) = rank {
                    for gate in spec.gates {
                        gate.check(rank, &triggers)?;
                    }
                }

                let ctx = Context {
                    spec,
                    rank,
                    weapon,
                    modifiers: &request.modifiers,
                    triggers: &triggers,
                    ranks: &self.ranks,
                    safety_cap: self.config.safety_cap,
                };
                match &spec.body {
                    ActionBody::Rolled(body) => roll::resolve(&ctx, body, &mut scripted),
                    ActionBody::Flat(body) => {
                        flat::validate(&ctx, body)?;
                        flat::resolve(&ctx, body, &mut scripted)
                    }
                }
            }
            None if looks_like_dice(&request.action) => {
                let notation: DiceNotation = request.action.parse()?;
                generic_roll(notation, &request.modifiers, &mut scripted)
            }
            None => return Err(EngineError::UnknownAction(request.action.clone())),
        };

        if !request.forced_rolls.is_empty() {
            let shown: Vec<String> = request.forced_rolls.iter().map(u32::to_string).collect();
            result
                .notes
                .push(format!("► [TEST] Forced rolls: {}", shown.join(", ")));
        }

        tracing::debug!(
            action = %result.action,
            rank = ?request.rank,
            tier = ?result.tier,
            total = result.final_total,
            "resolved action"
        );
        Ok(result)
    }

    fn ranks_for(
        &self,
        spec: &ActionSpec,
        request: &ActionRequest,
    ) -> EngineResult<(Option<Rank>, Option<Rank>)> {
        let mastery = || self.rank(request.rank.as_deref(), RankCategory::Mastery);
        Ok(match spec.ranks {
            RankUse::None => (None, None),
            RankUse::Mastery => (Some(mastery()?), None),
            RankUse::MasteryAndWeapon => (
                Some(mastery()?),
                Some(self.rank(request.weapon_rank.as_deref(), RankCategory::Weapon)?),
            ),
        })
    }

    fn rank(&self, input: Option<&str>, category: RankCategory) -> EngineResult<Rank> {
        let input = input.ok_or(EngineError::MissingRank(category))?;
        self.ranks
            .lookup(input, category)
            .map(|entry| entry.rank)
            .ok_or_else(|| EngineError::InvalidRank {
                category,
                input: input.to_string(),
            })
    }
}

fn check_required(
    spec: &ActionSpec,
    vocabulary: &trigger::TriggerVocabulary,
    triggers: &TriggerSet,
) -> EngineResult<()> {
    if spec.requires_one_of.is_empty() || spec.requires_one_of.iter().any(|t| triggers.has(t)) {
        return Ok(());
    }
    let options: Vec<&str> = spec
        .requires_one_of
        .iter()
        .map(|name| vocabulary.def(name).map_or(*name, |d| d.label))
        .collect();
    Err(EngineError::MissingTrigger {
        action: spec.title.to_string(),
        options: options.join(" or "),
    })
}

fn looks_like_dice(word: &str) -> bool {
    word.starts_with(|c: char| c.is_ascii_digit()) && word.to_ascii_lowercase().contains('d')
}

fn generic_roll(notation: DiceNotation, modifiers: &[i64], source: &mut dyn DieSource) -> ActionResult {
    let pool = notation.roll(source);
    let raw = pool.total();
    let mut components = vec![Component::labeled(raw, pool.to_string())];
    if !modifiers.is_empty() {
        let shown: Vec<String> = modifiers.iter().map(i64::to_string).collect();
        components.push(Component::labeled(
            modifiers.iter().fold(0i64, |a, m| a.saturating_add(*m)),
            format!("{} (mods)", shown.join(" + ")),
        ));
    }
    let resolution = resolve_total(&components, 1.0, None);

    ActionResult {
        action: notation.to_string(),
        title: format!("Roll {notation}"),
        kind: ActionKind::Action,
        calculation: render_calculation(&components, 1.0, false, None),
        pools: vec![pool],
        raw_dice_sum: raw,
        applied_modifier_total: resolution.subtotal - raw,
        subtotal: resolution.subtotal,
        multiplier: 1.0,
        final_total: resolution.total,
        split: None,
        tier: CritTier::Plain,
        headline: format!("**{} total**", resolution.total),
        passive: None,
        notes: Vec::new(),
    }
}

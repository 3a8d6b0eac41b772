//! Action resolution engine for the Sphera tabletop RPG roller.
//!
//! Takes an action word, rank letters, numeric modifiers and a free-text
//! comment, and produces a rolled, classified, fully itemised
//! [`ActionResult`]. Actions are declarative [`ActionSpec`] records
//! interpreted by one generic engine; randomness flows through
//! [`DieSource`] so every roll can be seeded or scripted.

pub mod action;
pub mod command;
pub mod config;
pub mod crit;
pub mod dice;
pub mod engine;
pub mod error;
pub mod modifier;
pub mod rank;
pub mod result;
pub mod trigger;

pub use action::{ActionKind, ActionSpec, Catalog, RankUse};
pub use command::{CommandParser, ParsedArgs};
pub use config::EngineConfig;
pub use crit::{CritTier, classify};
pub use dice::{DicePool, Die, DieSource, FixedSource, RngSource, ScriptedSource};
pub use engine::{ActionRequest, Engine};
pub use error::{EngineError, EngineResult};
pub use modifier::{Component, Split, resolve_total};
pub use rank::{ByRank, Rank, RankCategory, RankEntry, RankTable};
pub use result::ActionResult;
pub use trigger::{TriggerSet, TriggerVocabulary};

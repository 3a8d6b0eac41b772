//! Configuration for an engine instance.

use crate::dice::{RngSource, SAFETY_CAP};
use crate::error::{EngineError, EngineResult};

/// Configuration for an engine instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Prefix a chat line must start with, e.g. `?`.
    pub prefix: String,
    /// Maximum dice in one exploding pool.
    pub safety_cap: usize,
    /// RNG seed for reproducible rolls; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            prefix: "?".to_string(),
            safety_cap: SAFETY_CAP,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Set the command prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the exploding-pool safety cap (at least 1).
    pub fn with_safety_cap(mut self, cap: usize) -> Self {
        self.safety_cap = cap.max(1);
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> EngineResult<()> {
        if self.prefix.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "command prefix must not be empty".to_string(),
            ));
        }
        if self.safety_cap == 0 {
            return Err(EngineError::InvalidConfig(
                "safety cap must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// A random source honouring the configured seed.
    pub fn source(&self) -> RngSource {
        match self.seed {
            Some(seed) => RngSource::seeded(seed),
            None => RngSource::from_entropy(),
        }
    }
}

//! Timegraph configuration.
//!
//! All fields have defaults, so a partial JSON document such as
//! `{"search_budget": 500}` is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::canonical::fingerprint;
use crate::error::{Result, TimegraphError};
use crate::types::Pseudotime;
use crate::{PSEUDO_INCREMENT, PSEUDO_INIT};

/// Default number of points a single query may scan.
pub const DEFAULT_SEARCH_BUDGET: usize = 100_000;

/// Largest accepted magnitude of `pseudo_init` (2^40).
pub const MAX_PSEUDO_INIT: Pseudotime = 1 << 40;

/// Largest accepted `pseudo_increment` (2^20).
///
/// With at most 2^32 points per graph, every pseudotime stays far inside
/// the `i64` range.
pub const MAX_PSEUDO_INCREMENT: Pseudotime = 1 << 20;

/// Configuration for the query answer cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_entries: usize,
    /// Whether to enable the cache.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            enabled: true,
        }
    }
}

/// Tunables for pseudotime spacing and query cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimegraphConfig {
    /// Pseudotime of the first point of every new chain.
    pub pseudo_init: Pseudotime,
    /// Gap left between consecutive points when appending or prepending.
    pub pseudo_increment: Pseudotime,
    /// Points a query may scan before giving up with `Unknown`.
    /// `None` means unbounded.
    pub search_budget: Option<usize>,
    /// Query answer cache.
    pub cache: CacheConfig,
}

impl Default for TimegraphConfig {
    fn default() -> Self {
        Self {
            pseudo_init: PSEUDO_INIT,
            pseudo_increment: PSEUDO_INCREMENT,
            search_budget: Some(DEFAULT_SEARCH_BUDGET),
            cache: CacheConfig::default(),
        }
    }
}

impl TimegraphConfig {
    /// Configuration with no search budget: every query runs to completion.
    pub fn exhaustive() -> Self {
        Self {
            search_budget: None,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TimegraphError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values can drive the chain manager.
    pub fn validate(&self) -> Result<()> {
        if !(2..=MAX_PSEUDO_INCREMENT).contains(&self.pseudo_increment) {
            return Err(TimegraphError::InvalidConfig(format!(
                "pseudo_increment must be in 2..={MAX_PSEUDO_INCREMENT}, got {}",
                self.pseudo_increment
            )));
        }
        if !(-MAX_PSEUDO_INIT..=MAX_PSEUDO_INIT).contains(&self.pseudo_init) {
            return Err(TimegraphError::InvalidConfig(format!(
                "pseudo_init must be within +/-{MAX_PSEUDO_INIT}, got {}",
                self.pseudo_init
            )));
        }
        if self.search_budget == Some(0) {
            return Err(TimegraphError::InvalidConfig(
                "search_budget must be positive or null".to_string(),
            ));
        }
        if self.cache.enabled && self.cache.max_entries == 0 {
            return Err(TimegraphError::InvalidConfig(
                "cache.max_entries must be positive when the cache is enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Stable hash of all parameters.
    pub fn params_hash(&self) -> Result<String> {
        fingerprint(self).map_err(|e| TimegraphError::InvalidConfig(e.to_string()))
    }
}

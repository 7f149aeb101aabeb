//! Scan configuration that callers can serialize/deserialize.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Column-matching strategy. All strategies produce identical maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Nested scan for small inputs, hash buckets above `hash_cutover`.
    #[default]
    Auto,
    Nested,
    Hashed,
}

impl std::str::FromStr for MatchStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(MatchStrategy::Auto),
            "nested" => Ok(MatchStrategy::Nested),
            "hashed" => Ok(MatchStrategy::Hashed),
            other => Err(Error::Config(format!("unknown match strategy '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub strategy: MatchStrategy,

    /// Hash buckets are used when `(columns - 5) * (fields - 5)` exceeds this.
    pub hash_cutover: i64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::Auto,
            hash_cutover: 100,
        }
    }
}

static GLOBAL: Lazy<ScanConfig> = Lazy::new(ScanConfig::from_env);

impl ScanConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `ROWBIND_MATCH_STRATEGY`: `auto`, `nested` or `hashed`
    /// - `ROWBIND_HASH_CUTOVER`: integer cutover for the auto strategy
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(s) = lookup("ROWBIND_MATCH_STRATEGY") {
            if let Ok(v) = s.parse::<MatchStrategy>() {
                cfg.strategy = v;
            }
        }

        if let Some(s) = lookup("ROWBIND_HASH_CUTOVER") {
            if let Ok(v) = s.trim().parse::<i64>() {
                cfg.hash_cutover = v;
            }
        }

        cfg
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Process-wide snapshot of `from_env()`, read once on first use.
    pub fn global() -> &'static ScanConfig {
        &GLOBAL
    }

    /// Whether the hashed strategy applies to `columns` x `fields` inputs.
    pub fn use_hashed(&self, columns: usize, fields: usize) -> bool {
        match self.strategy {
            MatchStrategy::Nested => false,
            MatchStrategy::Hashed => true,
            MatchStrategy::Auto => {
                let m = columns as i64 - 5;
                let n = fields as i64 - 5;
                m.saturating_mul(n) > self.hash_cutover
            }
        }
    }

    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

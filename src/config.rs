//! Source configuration.
//!
//! Retry budgets live next to the generators that use them; this only covers
//! what a [`DataSource`](crate::data::DataSource) needs to start a trial.

use serde::{Deserialize, Serialize};

pub const SEED_ENV: &str = "CONJECTURE_GEN_SEED";
pub const MAX_DRAWS_ENV: &str = "CONJECTURE_GEN_MAX_DRAWS";

const DEFAULT_MAX_DRAWS: usize = 1 << 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Seed for the random stream. `None` draws a fresh seed from the OS.
    pub seed: Option<u64>,
    /// Maximum number of `draw_bits` calls in one trial before the source
    /// reports an overrun.
    pub max_draws: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            seed: None,
            max_draws: DEFAULT_MAX_DRAWS,
        }
    }
}

impl SourceConfig {
    pub fn seeded(seed: u64) -> Self {
        SourceConfig {
            seed: Some(seed),
            ..SourceConfig::default()
        }
    }

    /// Defaults overridden by `CONJECTURE_GEN_SEED` and
    /// `CONJECTURE_GEN_MAX_DRAWS`. Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = SourceConfig::default();
        if let Some(raw) = lookup(SEED_ENV) {
            match raw.trim().parse() {
                Ok(seed) => config.seed = Some(seed),
                Err(_) => log::warn!("ignoring malformed {}={:?}", SEED_ENV, raw),
            }
        }
        if let Some(raw) = lookup(MAX_DRAWS_ENV) {
            match raw.trim().parse() {
                Ok(max) if max > 0 => config.max_draws = max,
                _ => log::warn!("ignoring malformed {}={:?}", MAX_DRAWS_ENV, raw),
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = SourceConfig::from_lookup(lookup_in(&[]));
        assert_eq!(config, SourceConfig::default());
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_env_overrides() {
        let config = SourceConfig::from_lookup(lookup_in(&[
            (SEED_ENV, "1234"),
            (MAX_DRAWS_ENV, " 500 "),
        ]));
        assert_eq!(config.seed, Some(1234));
        assert_eq!(config.max_draws, 500);
    }

    #[test]
    fn test_malformed_env_is_ignored() {
        let config = SourceConfig::from_lookup(lookup_in(&[
            (SEED_ENV, "not-a-number"),
            (MAX_DRAWS_ENV, "0"),
        ]));
        assert_eq!(config, SourceConfig::default());
    }
}

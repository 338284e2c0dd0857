//! Engine configuration.

use serde::Deserialize;
use std::time::Duration;

use crate::error::ConfigError;

/// Tunables for the context builder and its trackers.
///
/// The defaults reproduce the standard engine behavior: a five-over recent
/// window, six-ball player form rings, and a 50ms budget for optional
/// enrichment calls.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Capacity of the recent-events sliding window, in balls.
    pub window_balls: usize,

    /// Capacity of per-player recent-form rings, in balls.
    pub form_balls: usize,

    /// Maximum callbacks carried on a snapshot (own + retrieved).
    pub max_callbacks: usize,

    /// Phrases remembered for repetition avoidance.
    pub phrase_history: usize,

    /// Phrases surfaced on each snapshot.
    pub phrases_per_snapshot: usize,

    /// Budget in milliseconds for each optional collaborator call.
    pub enrichment_budget_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_balls: 30,
            form_balls: 6,
            max_callbacks: 5,
            phrase_history: 20,
            phrases_per_snapshot: 5,
            enrichment_budget_ms: 50,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// The enrichment budget as a `Duration`.
    pub fn enrichment_budget(&self) -> Duration {
        Duration::from_millis(self.enrichment_budget_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.window_balls, 30);
        assert_eq!(config.form_balls, 6);
        assert_eq!(config.max_callbacks, 5);
        assert_eq!(config.enrichment_budget(), Duration::from_millis(50));
    }

    #[test]
    fn test_from_toml_overrides() {
        let config = EngineConfig::from_toml_str(
            "window_balls = 36\nenrichment_budget_ms = 25\n",
        )
        .unwrap();
        assert_eq!(config.window_balls, 36);
        assert_eq!(config.enrichment_budget_ms, 25);
        // Untouched fields keep their defaults
        assert_eq!(config.form_balls, 6);
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        assert!(EngineConfig::from_toml_str("window_balls = \"lots\"").is_err());
    }
}

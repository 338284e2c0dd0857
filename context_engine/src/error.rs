//! Error types for the context engine.
//!
//! Only input-order violations are fatal: they would silently corrupt the
//! aggregates if tolerated. Collaborator failures are absorbed at the call
//! site and arithmetic edge cases degrade to zero, so neither appears here.

use match_events::BallNumber;
use thiserror::Error;

/// Errors surfaced by `ContextBuilder::build`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContextError {
    /// A delivery arrived at or before the previously processed ball number.
    #[error("delivery {current} is not after previously processed ball {previous}")]
    OutOfOrderDelivery {
        previous: BallNumber,
        current: BallNumber,
    },

    /// A wicket event arrived with all ten wickets already down.
    #[error("wicket at {ball} but the innings already has 10 wickets down")]
    WicketsExhausted { ball: BallNumber },

    /// The running score decreased, which valid input can never produce.
    #[error("score snapshot regressed at {ball}: {previous} -> {current}")]
    ScoreRegression {
        ball: BallNumber,
        previous: u32,
        current: u32,
    },
}

/// Errors loading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid engine config: {0}")]
    Parse(#[from] toml::de::Error),
}

//! Optional collaborator interfaces - player stats and historical retrieval.
//!
//! Both collaborators are capability references the builder may or may not
//! hold. Their failures are absorbed at the call site: the snapshot must
//! never depend on a collaborator succeeding. Each call receives a budget the
//! implementation is responsible for honoring; the builder performs no
//! retries of its own.

use match_events::DeliveryEvent;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::snapshot::{MatchSituation, PressureLevel};

/// Failure of an optional enrichment call. Logged and discarded, never
/// propagated to the snapshot consumer.
#[derive(Debug, Clone, Error)]
pub enum CollaboratorError {
    #[error("collaborator call exceeded its {0:?} budget")]
    BudgetExceeded(Duration),
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
}

/// Head-to-head record between a batter and a bowler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHead {
    pub batter: String,
    pub bowler: String,
    pub balls_faced: u32,
    pub runs_scored: u32,
    pub dismissals: u32,
}

impl HeadToHead {
    /// One-line summary for the narrative matchup context.
    pub fn to_short_context(&self) -> String {
        format!(
            "{} vs {}: {} runs off {} balls, out {} time(s)",
            self.batter, self.bowler, self.runs_scored, self.balls_faced, self.dismissals
        )
    }
}

/// Source of historical player-vs-player statistics.
pub trait StatsProvider {
    /// Look up the head-to-head record for a batter/bowler pair.
    /// Returns `Ok(None)` when no history exists.
    fn head_to_head(
        &self,
        batter: &str,
        bowler: &str,
        budget: Duration,
    ) -> Result<Option<HeadToHead>, CollaboratorError>;
}

/// Source of historical parallels for the current moment.
pub trait RetrievalProvider {
    /// Retrieve up to a handful of historical-parallel lines for the
    /// current delivery and situation.
    fn retrieve(
        &self,
        event: &DeliveryEvent,
        situation: &MatchSituation,
        pressure: PressureLevel,
        budget: Duration,
    ) -> Result<Vec<String>, CollaboratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_to_head_summary() {
        let record = HeadToHead {
            batter: "Kohli".to_string(),
            bowler: "Starc".to_string(),
            balls_faced: 42,
            runs_scored: 61,
            dismissals: 2,
        };
        assert_eq!(
            record.to_short_context(),
            "Kohli vs Starc: 61 runs off 42 balls, out 2 time(s)"
        );
    }
}

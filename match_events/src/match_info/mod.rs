//! Match metadata - the immutable facts about a fixture, provided once.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Recognized match formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchFormat {
    Test,
    #[serde(rename = "ODI")]
    Odi,
    T20,
    T20I,
}

impl MatchFormat {
    /// Scheduled overs per innings, if the format caps them. T20I carries no
    /// cap here: its feeds are routed like an uncapped format, so no chase
    /// window is derived for it.
    pub fn total_overs(&self) -> Option<u32> {
        match self {
            MatchFormat::T20 => Some(20),
            MatchFormat::Odi => Some(50),
            MatchFormat::Test | MatchFormat::T20I => None,
        }
    }

    /// Whether this is a limited-overs format.
    pub fn is_limited_overs(&self) -> bool {
        self.total_overs().is_some()
    }
}

impl fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchFormat::Test => "Test",
            MatchFormat::Odi => "ODI",
            MatchFormat::T20 => "T20",
            MatchFormat::T20I => "T20I",
        };
        write!(f, "{}", name)
    }
}

/// Result of the toss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TossInfo {
    pub winner: String,
    /// "bat" or "field".
    pub decision: String,
}

/// Final outcome of the match, when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MatchOutcome {
    pub winner: Option<String>,
    pub by_runs: Option<u32>,
    pub by_wickets: Option<u32>,
    pub player_of_match: Vec<String>,
}

/// Metadata about a match. Immutable once constructed; the first team in
/// `teams` bats in the first innings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchInfo {
    pub match_id: String,
    pub teams: (String, String),
    pub venue: String,
    pub city: Option<String>,
    pub dates: Vec<String>,
    pub format: MatchFormat,
    pub gender: String,
    pub toss: TossInfo,
    pub outcome: MatchOutcome,
    /// Squad lists keyed by team name.
    pub players: HashMap<String, Vec<String>>,
}

impl MatchInfo {
    /// Minimal metadata for a fixture; the rest defaults to empty.
    pub fn new(
        match_id: impl Into<String>,
        teams: (impl Into<String>, impl Into<String>),
        venue: impl Into<String>,
        format: MatchFormat,
    ) -> Self {
        Self {
            match_id: match_id.into(),
            teams: (teams.0.into(), teams.1.into()),
            venue: venue.into(),
            city: None,
            dates: Vec::new(),
            format,
            gender: String::new(),
            toss: TossInfo::default(),
            outcome: MatchOutcome::default(),
            players: HashMap::new(),
        }
    }

    /// The team batting in the given innings (1-based).
    pub fn batting_team(&self, innings: u8) -> &str {
        if innings % 2 == 1 {
            &self.teams.0
        } else {
            &self.teams.1
        }
    }

    /// The team bowling in the given innings (1-based).
    pub fn bowling_team(&self, innings: u8) -> &str {
        if innings % 2 == 1 {
            &self.teams.1
        } else {
            &self.teams.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_overs() {
        assert_eq!(MatchFormat::T20.total_overs(), Some(20));
        assert_eq!(MatchFormat::Odi.total_overs(), Some(50));
        assert_eq!(MatchFormat::Test.total_overs(), None);
        assert!(!MatchFormat::Test.is_limited_overs());
        // T20I is uncapped: no overs-based phase or chase window
        assert_eq!(MatchFormat::T20I.total_overs(), None);
        assert!(!MatchFormat::T20I.is_limited_overs());
    }

    #[test]
    fn test_batting_team_by_innings() {
        let info = MatchInfo::new("m1", ("India", "Australia"), "MCG", MatchFormat::Test);

        assert_eq!(info.batting_team(1), "India");
        assert_eq!(info.bowling_team(1), "Australia");
        assert_eq!(info.batting_team(2), "Australia");
        // Test matches alternate again
        assert_eq!(info.batting_team(3), "India");
        assert_eq!(info.batting_team(4), "Australia");
    }

    #[test]
    fn test_format_serde_names() {
        let json = serde_json::to_string(&MatchFormat::Odi).unwrap();
        assert_eq!(json, "\"ODI\"");
        let back: MatchFormat = serde_json::from_str("\"T20\"").unwrap();
        assert_eq!(back, MatchFormat::T20);
    }
}

//! Delivery events - the atomic unit of play consumed by the context engine.

mod ball;

pub use ball::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happened on a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    DotBall,
    Single,
    Double,
    Triple,
    /// All-run five, usually four plus an overthrow.
    Five,
    BoundaryFour,
    BoundarySix,
    Wicket,
    Wide,
    NoBall,
    Bye,
    LegBye,
}

/// Extras conceded on a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrasKind {
    Wide,
    NoBall,
    Bye,
    LegBye,
}

impl ExtrasKind {
    /// Whether a delivery with these extras still counts toward the over.
    /// Wides and no-balls must be re-bowled; byes and leg-byes are legal.
    pub fn is_legal(&self) -> bool {
        matches!(self, ExtrasKind::Bye | ExtrasKind::LegBye)
    }
}

/// How a batter was dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WicketKind {
    Bowled,
    Caught,
    CaughtAndBowled,
    Lbw,
    RunOut,
    Stumped,
    HitWicket,
    Retired,
    Other,
}

impl WicketKind {
    /// Scorecard-style description of the dismissal.
    pub fn as_str(&self) -> &'static str {
        match self {
            WicketKind::Bowled => "bowled",
            WicketKind::Caught => "caught",
            WicketKind::CaughtAndBowled => "caught and bowled",
            WicketKind::Lbw => "lbw",
            WicketKind::RunOut => "run out",
            WicketKind::Stumped => "stumped",
            WicketKind::HitWicket => "hit wicket",
            WicketKind::Retired => "retired",
            WicketKind::Other => "out",
        }
    }
}

/// Point-in-time score snapshot embedded in each event by the upstream parser.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    pub innings: u8,
    pub runs: u32,
    pub wickets: u8,
    /// Cricket notation: whole part is completed overs, tenths are balls.
    pub overs_completed: f64,
    pub target: Option<u32>,
    pub required_rate: Option<f64>,
    pub current_rate: f64,
}

impl ScoreState {
    /// Whether the batting team is chasing a target.
    pub fn is_chasing(&self) -> bool {
        self.target.is_some()
    }

    /// Runs needed to win, if chasing.
    pub fn runs_required(&self) -> Option<i64> {
        self.target.map(|t| i64::from(t) - i64::from(self.runs))
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self {
            innings: 1,
            runs: 0,
            wickets: 0,
            overs_completed: 0.0,
            target: None,
            required_rate: None,
            current_rate: 0.0,
        }
    }
}

/// A single delivery - one bowled ball with its full outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryEvent {
    pub id: Uuid,
    pub event_type: EventType,
    pub ball_number: BallNumber,
    pub batter: String,
    pub bowler: String,
    pub non_striker: String,
    pub runs_batter: u32,
    pub runs_extras: u32,
    pub runs_total: u32,
    pub is_boundary: bool,
    pub is_wicket: bool,
    pub wicket_kind: Option<WicketKind>,
    pub wicket_player: Option<String>,
    pub fielder: Option<String>,
    pub extras: Option<ExtrasKind>,
    pub score: ScoreState,
}

impl DeliveryEvent {
    /// Create a dot ball; outcomes are layered on with the `with_*` builders.
    pub fn new(
        ball_number: BallNumber,
        batter: impl Into<String>,
        bowler: impl Into<String>,
        non_striker: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: EventType::DotBall,
            ball_number,
            batter: batter.into(),
            bowler: bowler.into(),
            non_striker: non_striker.into(),
            runs_batter: 0,
            runs_extras: 0,
            runs_total: 0,
            is_boundary: false,
            is_wicket: false,
            wicket_kind: None,
            wicket_player: None,
            fielder: None,
            extras: None,
            score: ScoreState::default(),
        }
    }

    /// Set runs scored off the bat.
    pub fn with_runs(mut self, runs: u32) -> Self {
        self.runs_batter = runs;
        self.runs_total = self.runs_batter + self.runs_extras;
        self.is_boundary = matches!(runs, 4 | 6);
        if !self.is_wicket {
            self.event_type = match runs {
                0 => EventType::DotBall,
                1 => EventType::Single,
                2 => EventType::Double,
                3 => EventType::Triple,
                4 => EventType::BoundaryFour,
                6 => EventType::BoundarySix,
                _ => EventType::Five,
            };
        }
        self
    }

    /// Set extras conceded on the delivery.
    pub fn with_extras(mut self, kind: ExtrasKind, runs: u32) -> Self {
        self.extras = Some(kind);
        self.runs_extras = runs;
        self.runs_total = self.runs_batter + self.runs_extras;
        if !self.is_wicket && self.runs_batter == 0 {
            self.event_type = match kind {
                ExtrasKind::Wide => EventType::Wide,
                ExtrasKind::NoBall => EventType::NoBall,
                ExtrasKind::Bye => EventType::Bye,
                ExtrasKind::LegBye => EventType::LegBye,
            };
        }
        self
    }

    /// Mark the delivery as a wicket; the striker is out unless named.
    pub fn with_wicket(mut self, kind: WicketKind) -> Self {
        self.is_wicket = true;
        self.event_type = EventType::Wicket;
        self.wicket_kind = Some(kind);
        self.wicket_player = Some(self.batter.clone());
        self
    }

    /// Name the fielder involved in the dismissal.
    pub fn with_fielder(mut self, fielder: impl Into<String>) -> Self {
        self.fielder = Some(fielder.into());
        self
    }

    /// Attach the point-in-time score snapshot.
    pub fn with_score(mut self, score: ScoreState) -> Self {
        self.score = score;
        self
    }

    /// Whether this was a dot ball (no runs, no wicket).
    pub fn is_dot_ball(&self) -> bool {
        self.runs_total == 0 && !self.is_wicket
    }

    /// Whether this delivery counts toward the over.
    pub fn is_legal_delivery(&self) -> bool {
        self.extras.map_or(true, |e| e.is_legal())
    }

    /// Human-readable description of the delivery.
    pub fn description(&self) -> String {
        if self.is_wicket {
            let player = self.wicket_player.as_deref().unwrap_or(&self.batter);
            let kind = self.wicket_kind.map_or("out", |k| k.as_str());
            return format!("WICKET! {} {}", player, kind);
        }
        match self.event_type {
            EventType::BoundarySix => format!("SIX! {} hits {} for 6", self.batter, self.bowler),
            EventType::BoundaryFour => format!("FOUR! {} hits {} for 4", self.batter, self.bowler),
            _ => {
                if let Some(extras) = self.extras {
                    if self.runs_batter == 0 {
                        return format!("{:?}: {} runs", extras, self.runs_extras);
                    }
                }
                if self.runs_batter > 0 {
                    format!("{} takes {}", self.batter, self.runs_batter)
                } else {
                    format!("Dot ball to {}", self.batter)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_builders() {
        let event = DeliveryEvent::new(BallNumber::new(4, 2), "Kohli", "Starc", "Sharma")
            .with_runs(4);

        assert_eq!(event.event_type, EventType::BoundaryFour);
        assert!(event.is_boundary);
        assert_eq!(event.runs_total, 4);
        assert!(!event.is_dot_ball());
        assert!(event.is_legal_delivery());
    }

    #[test]
    fn test_all_run_five_is_not_a_boundary() {
        let event = DeliveryEvent::new(BallNumber::new(7, 2), "Kohli", "Starc", "Sharma")
            .with_runs(5);

        assert_eq!(event.event_type, EventType::Five);
        assert!(!event.is_boundary);
        assert_eq!(event.runs_total, 5);
    }

    #[test]
    fn test_wicket_event() {
        let event = DeliveryEvent::new(BallNumber::new(10, 1), "Kohli", "Starc", "Sharma")
            .with_wicket(WicketKind::Caught)
            .with_fielder("Smith");

        assert!(event.is_wicket);
        assert_eq!(event.event_type, EventType::Wicket);
        assert_eq!(event.wicket_player.as_deref(), Some("Kohli"));
        assert_eq!(event.description(), "WICKET! Kohli caught");
    }

    #[test]
    fn test_wide_is_not_legal() {
        let event = DeliveryEvent::new(BallNumber::new(3, 4), "Kohli", "Starc", "Sharma")
            .with_extras(ExtrasKind::Wide, 1);

        assert!(!event.is_legal_delivery());
        assert_eq!(event.event_type, EventType::Wide);
        assert_eq!(event.runs_total, 1);
        assert!(!event.is_dot_ball());
    }

    #[test]
    fn test_leg_bye_counts_toward_over() {
        let event = DeliveryEvent::new(BallNumber::new(3, 4), "Kohli", "Starc", "Sharma")
            .with_extras(ExtrasKind::LegBye, 1);

        assert!(event.is_legal_delivery());
    }

    #[test]
    fn test_dot_ball_description() {
        let event = DeliveryEvent::new(BallNumber::new(0, 1), "Kohli", "Starc", "Sharma");
        assert!(event.is_dot_ball());
        assert_eq!(event.description(), "Dot ball to Kohli");
    }

    #[test]
    fn test_serde_round_trip() {
        let event = DeliveryEvent::new(BallNumber::new(19, 6), "Dhoni", "Boult", "Jadeja")
            .with_runs(6)
            .with_score(ScoreState {
                innings: 2,
                runs: 178,
                wickets: 6,
                overs_completed: 19.6,
                target: Some(180),
                required_rate: None,
                current_rate: 8.9,
            });

        let json = serde_json::to_string(&event).unwrap();
        let back: DeliveryEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.score.runs_required(), Some(2));
    }
}

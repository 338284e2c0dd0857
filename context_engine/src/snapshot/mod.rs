//! Snapshot data model - value types describing the state of play.
//!
//! Everything here is a plain value with at most simple derived properties.
//! One `RichContext` is produced per delivery and owns its data outright; it
//! never aliases builder-internal state.

use match_events::{DeliveryEvent, MatchFormat};
use serde::{Deserialize, Serialize};

/// Phase of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    /// Overs 1-6 in T20, 1-10 in ODI.
    Powerplay,
    /// Overs 7-15 in T20, 11-40 in ODI.
    MiddleOvers,
    /// Final overs of a limited-overs innings.
    DeathOvers,
    /// Test: morning session.
    FirstSession,
    /// Test: afternoon session.
    SecondSession,
    /// Test: evening session.
    ThirdSession,
    /// Generic early phase for uncapped formats.
    #[default]
    EarlyInnings,
    /// Generic middle phase.
    MiddleInnings,
    /// Generic late/climax phase.
    LateInnings,
}

/// Pressure intensity levels, from comfortable to match-defining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureLevel {
    Calm,
    Building,
    Tense,
    Intense,
    Critical,
}

impl PressureLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PressureLevel::Calm => "calm",
            PressureLevel::Building => "building",
            PressureLevel::Tense => "tense",
            PressureLevel::Intense => "intense",
            PressureLevel::Critical => "critical",
        }
    }
}

/// Which side currently holds the advantage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MomentumState {
    BattingDominant,
    BowlingDominant,
    #[default]
    Balanced,
    /// Just changed - transient, re-evaluated on the next delivery.
    MomentumShift,
    Uncertain,
}

impl MomentumState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MomentumState::BattingDominant => "batting_dominant",
            MomentumState::BowlingDominant => "bowling_dominant",
            MomentumState::Balanced => "balanced",
            MomentumState::MomentumShift => "momentum_shift",
            MomentumState::Uncertain => "uncertain",
        }
    }
}

/// Suggested commentary tone for the delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommentaryTone {
    Dramatic,
    Excited,
    Enthusiastic,
    Tense,
    Calm,
    #[default]
    Neutral,
}

/// Suggested commentary length for the delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommentaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

/// Rolling form of the batter on strike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BatterContext {
    pub name: String,
    pub runs_scored: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
    /// Runs per 100 balls faced.
    pub strike_rate: f64,
    pub is_on_strike: bool,
    /// Milestone within reach: "50", "100", "150", "200".
    pub approaching_milestone: Option<String>,
    pub runs_to_milestone: Option<u32>,
    /// Runs off the bat over the last six balls faced.
    pub recent_scoring: Vec<u32>,
    /// Consecutive dots faced.
    pub dot_ball_pressure: u32,
}

impl BatterContext {
    /// Batter just arrived (< 10 balls).
    pub fn is_new_batter(&self) -> bool {
        self.balls_faced < 10
    }

    /// Batter is settled (20+ balls, decent strike rate).
    pub fn is_settled(&self) -> bool {
        self.balls_faced >= 20 && self.strike_rate >= 50.0
    }

    /// Batter struggling (low strike rate after 15+ balls).
    pub fn is_struggling(&self) -> bool {
        self.balls_faced >= 15 && self.strike_rate < 60.0
    }
}

/// Rolling figures for the bowler in action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BowlerContext {
    pub name: String,
    /// Cricket notation: whole part is completed overs, tenths are balls.
    pub overs_bowled: f64,
    pub maidens: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
    /// Runs conceded per over bowled.
    pub economy: f64,
    pub current_spell_overs: f64,
    pub current_spell_wickets: u32,
    pub current_spell_runs: u32,
    /// Last six deliveries as scorecard symbols: "W", "4", "6", ".", "1"...
    pub recent_deliveries: Vec<String>,
    pub is_on_hat_trick: bool,
    pub consecutive_dots: u32,
}

impl BowlerContext {
    /// Bowler having a good spell.
    pub fn is_bowling_well(&self) -> bool {
        self.economy < 6.0 || self.current_spell_wickets >= 2
    }

    /// Bowler being hit around.
    pub fn is_expensive(&self) -> bool {
        self.economy > 9.0 && self.overs_bowled >= 2.0
    }
}

/// The current batting pair's stand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PartnershipContext {
    pub runs: u32,
    pub balls: u32,
    pub batter1_name: String,
    pub batter2_name: String,
    /// Runs per over for the stand.
    pub run_rate: f64,
    /// Rebuilding after recent wickets.
    pub is_rebuilding: bool,
    /// Partnership taking control.
    pub is_dominant: bool,
}

impl PartnershipContext {
    /// Partnership of note (50+).
    pub fn is_significant(&self) -> bool {
        self.runs >= 50
    }

    /// Century partnership.
    pub fn is_century_stand(&self) -> bool {
        self.runs >= 100
    }
}

/// The five-over sliding window over recent play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RecentEvents {
    pub last_six_balls: Vec<DeliveryEvent>,
    /// Scorecard-style summary of the last over, e.g. "1 . 4 W . 2".
    pub last_over_summary: String,
    pub wickets_in_last_5_overs: u32,
    pub boundaries_in_last_5_overs: u32,
    pub runs_in_last_5_overs: u32,
    pub last_wicket_description: Option<String>,
    pub balls_since_last_boundary: u32,
    pub balls_since_last_wicket: u32,
}

impl RecentEvents {
    /// No boundaries or wickets recently.
    pub fn is_quiet_period(&self) -> bool {
        self.balls_since_last_boundary > 18 && self.balls_since_last_wicket > 30
    }

    /// Lots happening recently.
    pub fn is_action_packed(&self) -> bool {
        self.boundaries_in_last_5_overs >= 4 || self.wickets_in_last_5_overs >= 2
    }
}

/// Overall match situation at the current delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSituation {
    pub batting_team: String,
    pub bowling_team: String,
    pub innings_number: u8,
    pub total_runs: u32,
    pub total_wickets: u8,
    pub overs_completed: f64,
    /// Balls left in the innings, for limited-overs formats.
    pub balls_remaining: Option<u32>,
    /// Chase target, when set.
    pub target: Option<u32>,
    pub runs_required: Option<i64>,
    pub required_rate: Option<f64>,
    pub current_run_rate: f64,
    pub phase: MatchPhase,
    pub match_format: MatchFormat,
}

impl MatchSituation {
    /// Format: `245/6 (42.3)`.
    pub fn score_string(&self) -> String {
        format!(
            "{}/{} ({})",
            self.total_runs, self.total_wickets, self.overs_completed
        )
    }

    /// Team is chasing a target.
    pub fn is_chase(&self) -> bool {
        self.target.is_some()
    }

    /// Chase is tight (required rate within 2 of current rate).
    pub fn is_close_chase(&self) -> bool {
        match self.required_rate {
            Some(rrr) if self.is_chase() => (rrr - self.current_run_rate).abs() <= 2.0,
            _ => false,
        }
    }

    /// Wickets remaining.
    pub fn wickets_in_hand(&self) -> u8 {
        10 - self.total_wickets
    }
}

/// Narrative and storytelling state for the current delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NarrativeState {
    /// Brief description of what's unfolding.
    pub current_storyline: String,
    /// Narrative tension from 0.0 to 1.0.
    pub tension_level: f64,
    pub momentum: MomentumState,
    /// The lead subplot, e.g. "Kohli 8 away from 100".
    pub key_subplot: Option<String>,
    /// What could happen next.
    pub dramatic_potential: Option<String>,
    /// Earlier moments worth referencing, historical parallels first.
    pub callbacks_available: Vec<String>,
    /// Head-to-head summary for the current batter/bowler pair.
    pub matchup_context: Option<String>,
}

impl NarrativeState {
    /// Render the narrative block for an LLM prompt.
    pub fn to_prompt_context(&self) -> String {
        let mut lines = vec![format!("Storyline: {}", self.current_storyline)];
        if let Some(subplot) = &self.key_subplot {
            lines.push(format!("Subplot: {}", subplot));
        }
        lines.push(format!("Momentum: {}", self.momentum.as_str()));
        let tension = if self.tension_level > 0.7 {
            "High"
        } else if self.tension_level > 0.4 {
            "Medium"
        } else {
            "Low"
        };
        lines.push(format!("Tension: {}", tension));
        if let Some(potential) = &self.dramatic_potential {
            lines.push(format!("Potential: {}", potential));
        }
        if let Some(matchup) = &self.matchup_context {
            lines.push(format!("Matchup: {}", matchup));
        }
        lines.join("\n")
    }
}

/// The fully-assembled situational snapshot for one delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichContext {
    /// The delivery being commented on.
    pub event: DeliveryEvent,
    pub situation: MatchSituation,
    pub batter: BatterContext,
    pub bowler: BowlerContext,
    pub partnership: PartnershipContext,
    pub recent: RecentEvents,
    pub narrative: NarrativeState,
    pub pressure: PressureLevel,
    /// Pressure score from 0.0 to 1.0.
    pub pressure_score: f64,
    pub suggested_tone: CommentaryTone,
    pub suggested_length: CommentaryLength,
    /// Recently used phrases the generator should not repeat.
    pub avoid_phrases: Vec<String>,
}

impl RichContext {
    /// Render the full snapshot as prompt text for an LLM.
    pub fn to_prompt_context(&self) -> String {
        let mut sections = Vec::new();

        sections.push("=== MATCH SITUATION ===".to_string());
        sections.push(format!(
            "{} vs {}",
            self.situation.batting_team, self.situation.bowling_team
        ));
        sections.push(format!("Score: {}", self.situation.score_string()));
        if self.situation.is_chase() {
            sections.push(format!(
                "Target: {}, Need: {} from {} balls",
                self.situation.target.unwrap_or(0),
                self.situation.runs_required.unwrap_or(0),
                self.situation.balls_remaining.unwrap_or(0),
            ));
            sections.push(format!(
                "Required rate: {:.2}, Current rate: {:.2}",
                self.situation.required_rate.unwrap_or(0.0),
                self.situation.current_run_rate,
            ));
        }
        sections.push(format!("Phase: {:?}", self.situation.phase));

        sections.push("\n=== THIS DELIVERY ===".to_string());
        sections.push(format!("{} to {}", self.bowler.name, self.batter.name));
        sections.push(format!("Result: {}", self.describe_event()));

        sections.push("\n=== BATTER ===".to_string());
        sections.push(format!(
            "{}: {} ({}), SR: {:.1}",
            self.batter.name,
            self.batter.runs_scored,
            self.batter.balls_faced,
            self.batter.strike_rate,
        ));
        if let Some(milestone) = &self.batter.approaching_milestone {
            sections.push(format!("Approaching: {}", milestone));
        }
        if self.batter.is_new_batter() {
            sections.push("Status: New at crease".to_string());
        } else if self.batter.is_struggling() {
            sections.push("Status: Struggling".to_string());
        } else if self.batter.is_settled() {
            sections.push("Status: Well set".to_string());
        }

        sections.push("\n=== BOWLER ===".to_string());
        sections.push(format!(
            "{}: {}-{}-{}-{}",
            self.bowler.name,
            self.bowler.overs_bowled,
            self.bowler.maidens,
            self.bowler.runs_conceded,
            self.bowler.wickets,
        ));
        if self.bowler.is_on_hat_trick {
            sections.push("ON A HAT-TRICK!".to_string());
        }
        if self.bowler.is_bowling_well() {
            sections.push("Status: Bowling well".to_string());
        } else if self.bowler.is_expensive() {
            sections.push("Status: Under pressure".to_string());
        }

        if self.partnership.runs > 0 {
            sections.push("\n=== PARTNERSHIP ===".to_string());
            sections.push(format!(
                "{} runs, {} balls",
                self.partnership.runs, self.partnership.balls
            ));
        }

        sections.push("\n=== NARRATIVE ===".to_string());
        sections.push(self.narrative.to_prompt_context());

        sections.push(format!(
            "\n=== PRESSURE: {} ===",
            self.pressure.as_str().to_uppercase()
        ));

        sections.push("\n=== COMMENTARY GUIDANCE ===".to_string());
        sections.push(format!("Tone: {:?}", self.suggested_tone));
        sections.push(format!("Length: {:?}", self.suggested_length));
        if !self.avoid_phrases.is_empty() {
            let avoid: Vec<_> = self.avoid_phrases.iter().take(3).cloned().collect();
            sections.push(format!("Avoid: {}", avoid.join(", ")));
        }

        sections.join("\n")
    }

    /// Brief description of the current delivery's result.
    fn describe_event(&self) -> String {
        let event = &self.event;
        if event.is_wicket {
            let kind = event.wicket_kind.map_or("out", |k| k.as_str());
            return format!("WICKET! {}", kind);
        }
        match event.runs_batter {
            6 => "SIX!".to_string(),
            4 => "FOUR!".to_string(),
            _ if event.runs_total == 0 => "Dot ball".to_string(),
            _ => format!("{} run(s)", event.runs_total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use match_events::{BallNumber, WicketKind};

    fn sample_situation() -> MatchSituation {
        MatchSituation {
            batting_team: "India".to_string(),
            bowling_team: "Australia".to_string(),
            innings_number: 2,
            total_runs: 245,
            total_wickets: 6,
            overs_completed: 42.3,
            balls_remaining: Some(45),
            target: Some(290),
            runs_required: Some(45),
            required_rate: Some(6.0),
            current_run_rate: 5.76,
            phase: MatchPhase::DeathOvers,
            match_format: MatchFormat::Odi,
        }
    }

    #[test]
    fn test_score_string() {
        assert_eq!(sample_situation().score_string(), "245/6 (42.3)");
    }

    #[test]
    fn test_chase_properties() {
        let situation = sample_situation();
        assert!(situation.is_chase());
        assert!(situation.is_close_chase());
        assert_eq!(situation.wickets_in_hand(), 4);

        let mut first_innings = situation;
        first_innings.target = None;
        first_innings.required_rate = None;
        assert!(!first_innings.is_chase());
        assert!(!first_innings.is_close_chase());
    }

    #[test]
    fn test_batter_status_flags() {
        let mut batter = BatterContext {
            name: "Kohli".to_string(),
            balls_faced: 5,
            strike_rate: 40.0,
            ..Default::default()
        };
        assert!(batter.is_new_batter());
        assert!(!batter.is_settled());

        batter.balls_faced = 25;
        batter.strike_rate = 120.0;
        assert!(!batter.is_new_batter());
        assert!(batter.is_settled());
        assert!(!batter.is_struggling());

        batter.strike_rate = 45.0;
        assert!(batter.is_struggling());
    }

    #[test]
    fn test_bowler_status_flags() {
        let mut bowler = BowlerContext {
            name: "Starc".to_string(),
            overs_bowled: 4.0,
            economy: 5.2,
            ..Default::default()
        };
        assert!(bowler.is_bowling_well());
        assert!(!bowler.is_expensive());

        bowler.economy = 9.5;
        assert!(!bowler.is_bowling_well());
        assert!(bowler.is_expensive());

        // Two spell wickets outweigh a poor economy
        bowler.current_spell_wickets = 2;
        assert!(bowler.is_bowling_well());
    }

    #[test]
    fn test_partnership_flags() {
        let mut stand = PartnershipContext {
            runs: 62,
            balls: 48,
            ..Default::default()
        };
        assert!(stand.is_significant());
        assert!(!stand.is_century_stand());

        stand.runs = 104;
        assert!(stand.is_century_stand());
    }

    #[test]
    fn test_recent_events_flags() {
        let quiet = RecentEvents {
            balls_since_last_boundary: 20,
            balls_since_last_wicket: 40,
            ..Default::default()
        };
        assert!(quiet.is_quiet_period());
        assert!(!quiet.is_action_packed());

        let busy = RecentEvents {
            boundaries_in_last_5_overs: 5,
            ..Default::default()
        };
        assert!(busy.is_action_packed());
    }

    #[test]
    fn test_narrative_prompt_context() {
        let narrative = NarrativeState {
            current_storyline: "Breakthrough! Kohli departs".to_string(),
            tension_level: 0.8,
            momentum: MomentumState::MomentumShift,
            key_subplot: Some("Starc on a roll in this spell".to_string()),
            dramatic_potential: None,
            callbacks_available: vec![],
            matchup_context: None,
        };

        let text = narrative.to_prompt_context();
        assert!(text.contains("Storyline: Breakthrough! Kohli departs"));
        assert!(text.contains("Momentum: momentum_shift"));
        assert!(text.contains("Tension: High"));
    }

    #[test]
    fn test_rich_context_prompt() {
        let event = DeliveryEvent::new(BallNumber::new(42, 3), "Jadeja", "Starc", "Rahul")
            .with_wicket(WicketKind::Bowled);

        let context = RichContext {
            event,
            situation: sample_situation(),
            batter: BatterContext {
                name: "Jadeja".to_string(),
                runs_scored: 18,
                balls_faced: 22,
                strike_rate: 81.8,
                ..Default::default()
            },
            bowler: BowlerContext {
                name: "Starc".to_string(),
                overs_bowled: 8.3,
                wickets: 3,
                runs_conceded: 41,
                economy: 5.1,
                ..Default::default()
            },
            partnership: PartnershipContext::default(),
            recent: RecentEvents::default(),
            narrative: NarrativeState::default(),
            pressure: PressureLevel::Intense,
            pressure_score: 0.72,
            suggested_tone: CommentaryTone::Dramatic,
            suggested_length: CommentaryLength::Long,
            avoid_phrases: vec!["what a delivery".to_string()],
        };

        let text = context.to_prompt_context();
        assert!(text.contains("India vs Australia"));
        assert!(text.contains("Score: 245/6 (42.3)"));
        assert!(text.contains("Target: 290, Need: 45 from 45 balls"));
        assert!(text.contains("Result: WICKET! bowled"));
        assert!(text.contains("PRESSURE: INTENSE"));
        assert!(text.contains("Avoid: what a delivery"));
    }

    #[test]
    fn test_snapshot_serde_round_trip() {
        let situation = sample_situation();
        let json = serde_json::to_string(&situation).unwrap();
        let back: MatchSituation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, situation);
    }
}

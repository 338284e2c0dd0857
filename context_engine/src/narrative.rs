//! Narrative tracking - momentum, storylines, subplots, and callbacks.

use match_events::{BallNumber, DeliveryEvent};
use serde::{Deserialize, Serialize};

use crate::snapshot::{MomentumState, NarrativeState};

/// Batting milestones worth building narrative around.
const MILESTONES: [u32; 4] = [50, 100, 150, 200];

/// A notable moment recorded for later callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorylineEvent {
    /// Ball at which the moment happened; spells end between balls.
    pub ball_number: Option<BallNumber>,
    pub description: String,
    /// "wicket", "milestone", "spell", ...
    pub event_type: String,
    pub player: String,
    /// Narrative weight from 0.0 to 1.0.
    pub significance: f64,
}

/// Tracks the match story across one innings.
///
/// Responsibilities:
/// - Identify the current storyline
/// - Track momentum and when it last shifted
/// - Detect subplots (milestone chases, hot spells, partnerships)
/// - Provide callbacks to earlier moments
/// - Assess dramatic potential
#[derive(Debug, Clone, Default)]
pub struct NarrativeTracker {
    storyline_events: Vec<StorylineEvent>,
    current_momentum: MomentumState,
    momentum_shift_ball: Option<BallNumber>,
    active_subplots: Vec<String>,

    consecutive_boundaries: u32,
    consecutive_dots: u32,
    wickets_in_spell: u32,
    runs_since_wicket: u32,
    current_spell_bowler: Option<String>,
}

impl NarrativeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the narrative from the latest delivery and return the new state.
    pub fn update(
        &mut self,
        event: &DeliveryEvent,
        batter_runs: u32,
        batter_balls: u32,
        bowler_wickets: u32,
        partnership_runs: u32,
    ) -> NarrativeState {
        self.update_tracking(event);

        let new_momentum = self.detect_momentum(event);
        if new_momentum != self.current_momentum {
            self.momentum_shift_ball = Some(event.ball_number);
            self.current_momentum = new_momentum;
        }

        self.active_subplots =
            self.identify_subplots(event, batter_runs, batter_balls, bowler_wickets, partnership_runs);

        NarrativeState {
            current_storyline: self.build_storyline(event),
            tension_level: self.calculate_tension(event),
            momentum: self.current_momentum,
            key_subplot: self.active_subplots.first().cloned(),
            dramatic_potential: self.assess_dramatic_potential(event, batter_runs, partnership_runs),
            callbacks_available: self.relevant_callbacks(event),
            matchup_context: None,
        }
    }

    /// The momentum after the most recent update.
    pub fn momentum(&self) -> MomentumState {
        self.current_momentum
    }

    /// Ball at which momentum last changed, if it has.
    pub fn momentum_shift_ball(&self) -> Option<BallNumber> {
        self.momentum_shift_ball
    }

    /// Subplots detected on the most recent update, highest priority first.
    pub fn active_subplots(&self) -> &[String] {
        &self.active_subplots
    }

    /// Record a milestone reached, for future callbacks.
    pub fn record_milestone(&mut self, ball_number: BallNumber, player: &str, milestone: &str) {
        self.storyline_events.push(StorylineEvent {
            ball_number: Some(ball_number),
            description: format!("{} reaches {}!", player, milestone),
            event_type: "milestone".to_string(),
            player: player.to_string(),
            significance: 0.9,
        });
    }

    /// Record the end of a bowling spell, if it was worth remembering.
    pub fn record_spell_end(&mut self, bowler: &str, overs: f64, wickets: u32, runs: u32) {
        let economical = overs >= 4.0 && f64::from(runs) / overs < 5.0;
        if wickets >= 2 || economical {
            self.storyline_events.push(StorylineEvent {
                ball_number: None,
                description: format!("{}'s spell: {}-{}-{}", bowler, overs, wickets, runs),
                event_type: "spell".to_string(),
                player: bowler.to_string(),
                significance: if wickets < 3 { 0.6 } else { 0.8 },
            });
        }
    }

    /// Reset all per-innings state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn update_tracking(&mut self, event: &DeliveryEvent) {
        if event.is_boundary {
            self.consecutive_boundaries += 1;
            self.consecutive_dots = 0;
        } else if event.runs_total == 0 && !event.is_wicket {
            self.consecutive_dots += 1;
            self.consecutive_boundaries = 0;
        } else {
            self.consecutive_boundaries = 0;
            self.consecutive_dots = 0;
        }

        // A returning bowler starts a fresh spell; check before crediting the
        // wicket so a first-ball strike counts toward the new spell.
        if self.current_spell_bowler.as_deref() != Some(event.bowler.as_str()) {
            self.current_spell_bowler = Some(event.bowler.clone());
            self.wickets_in_spell = 0;
        }

        if event.is_wicket {
            self.runs_since_wicket = 0;
            self.wickets_in_spell += 1;

            self.storyline_events.push(StorylineEvent {
                ball_number: Some(event.ball_number),
                description: format!("{} dismissed by {}", event.batter, event.bowler),
                event_type: "wicket".to_string(),
                player: event.bowler.clone(),
                significance: 0.7,
            });
        } else {
            self.runs_since_wicket += event.runs_total;
        }
    }

    fn detect_momentum(&self, event: &DeliveryEvent) -> MomentumState {
        if self.consecutive_boundaries >= 3 {
            return MomentumState::BattingDominant;
        }

        if self.consecutive_dots >= 6 {
            return MomentumState::BowlingDominant;
        }

        if self.wickets_in_spell >= 2 {
            return MomentumState::BowlingDominant;
        }

        if self.runs_since_wicket >= 50 {
            return MomentumState::BattingDominant;
        }

        // Transient: superseded by the cascade on the next delivery
        if event.is_wicket {
            return MomentumState::MomentumShift;
        }

        MomentumState::Balanced
    }

    fn identify_subplots(
        &self,
        event: &DeliveryEvent,
        batter_runs: u32,
        batter_balls: u32,
        bowler_wickets: u32,
        partnership_runs: u32,
    ) -> Vec<String> {
        let mut subplots = Vec::new();

        for milestone in MILESTONES {
            if batter_runs < milestone && batter_runs + 10 >= milestone {
                let to_go = milestone - batter_runs;
                subplots.push(format!("{} {} away from {}", event.batter, to_go, milestone));
                break;
            }
        }

        if bowler_wickets >= 3 {
            subplots.push(format!(
                "{}'s devastating spell ({} wickets)",
                event.bowler, bowler_wickets
            ));
        } else if self.wickets_in_spell >= 2 {
            subplots.push(format!("{} on a roll in this spell", event.bowler));
        }

        if partnership_runs >= 50 {
            subplots.push(format!("Partnership building: {} runs", partnership_runs));
        }

        if batter_balls < 10 {
            subplots.push(format!("{} looking to settle in", event.batter));
        }

        if batter_balls >= 20 && f64::from(batter_runs) / f64::from(batter_balls) > 1.5 {
            subplots.push(format!("{} in imperious form", event.batter));
        }

        subplots
    }

    fn build_storyline(&self, event: &DeliveryEvent) -> String {
        if event.is_wicket {
            if self.wickets_in_spell >= 2 {
                return format!("{} is wreaking havoc, another one falls!", event.bowler);
            }
            return format!("Breakthrough! {} departs", event.batter);
        }

        if self.consecutive_boundaries >= 3 {
            return format!("Boundaries flowing! {} taking control", event.batter);
        }

        if self.consecutive_dots >= 6 {
            return format!("Pressure building, {} dots in a row", self.consecutive_dots);
        }

        match self.current_momentum {
            MomentumState::BattingDominant => "Batters on top, scoring freely".to_string(),
            MomentumState::BowlingDominant => {
                "Bowlers creating chances, batters under pressure".to_string()
            }
            _ => "Contest evenly poised".to_string(),
        }
    }

    fn assess_dramatic_potential(
        &self,
        event: &DeliveryEvent,
        batter_runs: u32,
        partnership_runs: u32,
    ) -> Option<String> {
        for milestone in [50, 100] {
            if batter_runs < milestone && batter_runs + 5 >= milestone {
                return Some(format!("{} could reach {} soon", event.batter, milestone));
            }
        }

        if (45..50).contains(&partnership_runs) {
            return Some("50 partnership within reach".to_string());
        }
        if (95..100).contains(&partnership_runs) {
            return Some("Century partnership beckons".to_string());
        }

        if self.wickets_in_spell >= 2 && event.is_wicket {
            return Some(format!("Could {} get another?", event.bowler));
        }

        if self.consecutive_dots >= 6 {
            return Some("Something has to give".to_string());
        }

        None
    }

    fn relevant_callbacks(&self, event: &DeliveryEvent) -> Vec<String> {
        let recent = self
            .storyline_events
            .iter()
            .rev()
            .take(10)
            .collect::<Vec<_>>();

        recent
            .into_iter()
            .rev()
            .filter(|story| story.player == event.batter || story.player == event.bowler)
            .map(|story| match story.ball_number {
                Some(ball) => format!("Earlier: {} ({})", story.description, ball),
                None => format!("Earlier: {}", story.description),
            })
            .take(3)
            .collect()
    }

    fn calculate_tension(&self, event: &DeliveryEvent) -> f64 {
        let mut tension: f64 = 0.3;

        if event.is_wicket {
            tension += 0.3;
        }

        if self.consecutive_dots >= 6 {
            tension += 0.2;
        }

        if self.current_momentum == MomentumState::MomentumShift {
            tension += 0.2;
        }

        tension.min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use match_events::WicketKind;

    fn delivery(over: u32, ball: u8) -> DeliveryEvent {
        DeliveryEvent::new(BallNumber::new(over, ball), "Kohli", "Starc", "Sharma")
    }

    #[test]
    fn test_boundary_spree_turns_momentum() {
        let mut tracker = NarrativeTracker::new();

        for ball in 1..=2 {
            let state = tracker.update(&delivery(5, ball).with_runs(4), 20, 15, 0, 30);
            assert_ne!(state.momentum, MomentumState::BattingDominant);
        }

        let state = tracker.update(&delivery(5, 3).with_runs(4), 28, 17, 0, 38);
        assert_eq!(state.momentum, MomentumState::BattingDominant);
        assert_eq!(tracker.momentum_shift_ball(), Some(BallNumber::new(5, 3)));
        assert!(state.current_storyline.contains("Boundaries flowing"));
    }

    #[test]
    fn test_wicket_is_transient_shift() {
        let mut tracker = NarrativeTracker::new();

        let state = tracker.update(&delivery(8, 2).with_wicket(WicketKind::Bowled), 12, 18, 1, 25);
        assert_eq!(state.momentum, MomentumState::MomentumShift);
        assert!(state.current_storyline.contains("Breakthrough"));
        assert!((state.tension_level - 0.8).abs() < 1e-9);

        // Next non-wicket delivery re-evaluates via the standard cascade
        let state = tracker.update(&delivery(8, 3).with_runs(1), 1, 1, 1, 1);
        assert_eq!(state.momentum, MomentumState::Balanced);
    }

    #[test]
    fn test_dot_drought_turns_momentum() {
        let mut tracker = NarrativeTracker::new();

        for ball in 1..=5 {
            let state = tracker.update(&delivery(9, ball), 15, 20, 0, 20);
            assert_eq!(state.momentum, MomentumState::Balanced);
        }

        let state = tracker.update(&delivery(9, 6), 15, 21, 0, 20);
        assert_eq!(state.momentum, MomentumState::BowlingDominant);
        assert!(state.current_storyline.contains("6 dots in a row"));
        assert_eq!(
            state.dramatic_potential.as_deref(),
            Some("Something has to give")
        );
    }

    #[test]
    fn test_two_spell_wickets_turn_momentum() {
        let mut tracker = NarrativeTracker::new();

        tracker.update(&delivery(3, 1).with_wicket(WicketKind::Caught), 5, 8, 1, 10);
        let state = tracker.update(&delivery(3, 4).with_wicket(WicketKind::Lbw), 0, 1, 2, 0);

        assert_eq!(state.momentum, MomentumState::BowlingDominant);
        assert!(state.current_storyline.contains("wreaking havoc"));
        assert_eq!(
            state.dramatic_potential.as_deref(),
            Some("Could Starc get another?")
        );
    }

    #[test]
    fn test_spell_reset_on_bowler_change() {
        let mut tracker = NarrativeTracker::new();

        tracker.update(&delivery(3, 1).with_wicket(WicketKind::Caught), 5, 8, 1, 10);

        // Different bowler: spell wicket count starts over
        let mut other = delivery(4, 1).with_wicket(WicketKind::Bowled);
        other.bowler = "Cummins".to_string();
        let state = tracker.update(&other, 0, 1, 1, 0);

        assert_eq!(state.momentum, MomentumState::MomentumShift);
    }

    #[test]
    fn test_fifty_since_wicket_turns_momentum() {
        let mut tracker = NarrativeTracker::new();

        let mut state = tracker.update(&delivery(10, 1).with_runs(2), 30, 22, 0, 40);
        for ball in 2..=6 {
            state = tracker.update(&delivery(10, ball).with_runs(2), 30, 22, 0, 40);
        }
        assert_eq!(state.momentum, MomentumState::Balanced);

        // Push the running total past fifty without a boundary spree
        for over in 11..=14 {
            for ball in 1..=6 {
                state = tracker.update(&delivery(over, ball).with_runs(2), 30, 22, 0, 40);
            }
        }
        assert_eq!(state.momentum, MomentumState::BattingDominant);
    }

    #[test]
    fn test_milestone_subplot_has_priority() {
        let mut tracker = NarrativeTracker::new();

        let state = tracker.update(&delivery(30, 2).with_runs(1), 94, 80, 0, 60);
        assert_eq!(state.key_subplot.as_deref(), Some("Kohli 6 away from 100"));
        // Partnership subplot still detected, just lower priority
        assert!(tracker
            .active_subplots()
            .iter()
            .any(|s| s.contains("Partnership building")));
    }

    #[test]
    fn test_dramatic_potential_near_milestone() {
        let mut tracker = NarrativeTracker::new();

        let state = tracker.update(&delivery(20, 4).with_runs(2), 47, 35, 0, 20);
        assert_eq!(
            state.dramatic_potential.as_deref(),
            Some("Kohli could reach 50 soon")
        );

        let state = tracker.update(&delivery(20, 5).with_runs(1), 40, 36, 0, 48);
        assert_eq!(
            state.dramatic_potential.as_deref(),
            Some("50 partnership within reach")
        );
    }

    #[test]
    fn test_callbacks_filter_by_player() {
        let mut tracker = NarrativeTracker::new();

        tracker.update(&delivery(5, 3).with_wicket(WicketKind::Bowled), 10, 12, 1, 15);
        tracker.record_milestone(BallNumber::new(12, 4), "Sharma", "50");

        // Starc bowling: his earlier wicket is relevant, Sharma's milestone is not
        let state = tracker.update(&delivery(13, 1).with_runs(1), 2, 3, 1, 4);
        assert_eq!(state.callbacks_available.len(), 1);
        assert!(state.callbacks_available[0].contains("dismissed by Starc"));
        assert!(state.callbacks_available[0].contains("(5.3)"));
    }

    #[test]
    fn test_record_spell_end_thresholds() {
        let mut tracker = NarrativeTracker::new();

        // Expensive wicketless spell: forgotten
        tracker.record_spell_end("Cummins", 3.0, 0, 30);
        // Two wickets: remembered
        tracker.record_spell_end("Starc", 4.0, 2, 22);
        // Long economical spell: remembered
        tracker.record_spell_end("Ashwin", 6.0, 1, 18);

        let state = tracker.update(&delivery(40, 1).with_runs(0), 10, 15, 2, 12);
        assert!(state
            .callbacks_available
            .iter()
            .any(|c| c.contains("Starc's spell")));
        assert!(!state.callbacks_available.iter().any(|c| c.contains("Cummins")));
    }

    #[test]
    fn test_reset_clears_innings_state() {
        let mut tracker = NarrativeTracker::new();

        tracker.update(&delivery(5, 3).with_wicket(WicketKind::Bowled), 10, 12, 1, 15);
        assert_ne!(tracker.momentum(), MomentumState::Balanced);

        tracker.reset();
        assert_eq!(tracker.momentum(), MomentumState::Balanced);
        assert_eq!(tracker.momentum_shift_ball(), None);

        let state = tracker.update(&delivery(0, 1).with_runs(0), 0, 1, 0, 0);
        assert!(state.callbacks_available.is_empty());
    }
}

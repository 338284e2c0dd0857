//! Pressure scoring - a pure heuristic over the match situation.
//!
//! Factors considered:
//! - Match phase (death overs carry the highest base pressure)
//! - Required run rate vs current run rate
//! - Wickets in hand and recent wicket clusters
//! - Scoring droughts (balls since the last boundary)
//! - Batter situation (new vs settled)

use crate::snapshot::{MatchPhase, MatchSituation, PressureLevel};

/// Descending score thresholds mapping to discrete levels.
const LEVEL_THRESHOLDS: [(f64, PressureLevel); 5] = [
    (0.8, PressureLevel::Critical),
    (0.6, PressureLevel::Intense),
    (0.4, PressureLevel::Tense),
    (0.2, PressureLevel::Building),
    (0.0, PressureLevel::Calm),
];

/// Base pressure contributed by the match phase.
const fn phase_base_pressure(phase: MatchPhase) -> f64 {
    match phase {
        MatchPhase::Powerplay => 0.3,
        MatchPhase::MiddleOvers => 0.2,
        MatchPhase::DeathOvers => 0.5,
        MatchPhase::FirstSession => 0.3,
        MatchPhase::SecondSession => 0.25,
        MatchPhase::ThirdSession => 0.4,
        MatchPhase::EarlyInnings => 0.2,
        MatchPhase::MiddleInnings => 0.3,
        MatchPhase::LateInnings => 0.5,
    }
}

/// Calculates pressure levels from the match situation.
///
/// Stateless and deterministic: the same inputs always produce the same
/// `(level, score)` pair, and the score is clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PressureCalculator;

impl PressureCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Calculate the pressure level and score for the current delivery.
    pub fn calculate(
        &self,
        situation: &MatchSituation,
        wickets_in_last_5_overs: u32,
        is_new_batter: bool,
        balls_since_boundary: u32,
    ) -> (PressureLevel, f64) {
        let mut score = phase_base_pressure(situation.phase);

        if situation.is_chase() && situation.required_rate.is_some() {
            score += chase_pressure(situation);
        }

        score += wickets_pressure(situation.total_wickets, wickets_in_last_5_overs);

        // Scoring drought builds tension
        if balls_since_boundary > 12 {
            score += (f64::from(balls_since_boundary - 12) * 0.01).min(0.15);
        }

        // New batters are vulnerable
        if is_new_batter {
            score += 0.1;
        }

        let score = score.clamp(0.0, 1.0);
        (score_to_level(score), score)
    }

    /// Human-readable description of a pressure level.
    pub fn pressure_description(&self, level: PressureLevel) -> &'static str {
        match level {
            PressureLevel::Calm => "Comfortable situation, batters can play freely",
            PressureLevel::Building => "Pressure starting to mount, need to rotate strike",
            PressureLevel::Tense => "Tense situation, every run matters",
            PressureLevel::Intense => "High pressure moment, crucial phase of the match",
            PressureLevel::Critical => "Match on a knife's edge, one ball could change everything",
        }
    }
}

/// Pressure contributed by the chase situation.
fn chase_pressure(situation: &MatchSituation) -> f64 {
    let Some(required_rate) = situation.required_rate else {
        return 0.0;
    };

    let mut pressure = 0.0;

    if situation.current_run_rate > 0.0 {
        let rate_diff = required_rate - situation.current_run_rate;
        if rate_diff > 0.0 {
            pressure += (rate_diff * 0.05).min(0.3);
        } else if rate_diff < -2.0 {
            // Well ahead of the rate
            pressure -= 0.1;
        }
    }

    if let (Some(balls_remaining), Some(runs_required)) =
        (situation.balls_remaining, situation.runs_required)
    {
        // Last five overs of the chase
        if balls_remaining <= 30 {
            pressure += f64::from(30 - balls_remaining) * 0.01;
        }

        // Very close finish
        if runs_required <= 20 && balls_remaining <= 12 {
            pressure += 0.2;
        }
    }

    if let Some(runs_required) = situation.runs_required {
        let wickets_in_hand = u32::from(situation.wickets_in_hand()).max(1);
        if runs_required as f64 / f64::from(wickets_in_hand) > 30.0 {
            pressure += 0.15;
        }
    }

    pressure
}

/// Pressure contributed by wickets already lost and recent clusters.
fn wickets_pressure(total_wickets: u8, recent_wickets: u32) -> f64 {
    let mut pressure = 0.0;

    if total_wickets >= 7 {
        pressure += 0.25;
    } else if total_wickets >= 5 {
        pressure += 0.15;
    } else if total_wickets >= 3 {
        pressure += 0.1;
    }

    // Collapse in progress
    if recent_wickets >= 3 {
        pressure += 0.2;
    } else if recent_wickets >= 2 {
        pressure += 0.1;
    }

    pressure
}

fn score_to_level(score: f64) -> PressureLevel {
    for (threshold, level) in LEVEL_THRESHOLDS {
        if score >= threshold {
            return level;
        }
    }
    PressureLevel::Calm
}

//! Context builder - the stateful orchestrator producing one snapshot per ball.
//!
//! One `ContextBuilder` owns the aggregates for exactly one innings. Events
//! must arrive strictly in order and be processed exactly once; the builder
//! rejects anything else loudly rather than silently double-counting. It is
//! not safe to share across concurrently processed innings - use one builder
//! per innings.

mod window;

pub use window::*;

use log::{debug, warn};
use std::collections::{HashMap, VecDeque};

use match_events::{BallNumber, DeliveryEvent, MatchFormat, MatchInfo};

use crate::collaborators::{RetrievalProvider, StatsProvider};
use crate::config::EngineConfig;
use crate::error::ContextError;
use crate::narrative::NarrativeTracker;
use crate::pressure::PressureCalculator;
use crate::snapshot::{
    BatterContext, BowlerContext, CommentaryLength, CommentaryTone, MatchPhase, MatchSituation,
    NarrativeState, PartnershipContext, PressureLevel, RecentEvents, RichContext,
};

/// Batting milestones checked for approach flagging.
const MILESTONES: [u32; 4] = [50, 100, 150, 200];

/// One delivery in a bowler's recent ring, scorecard style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeliverySymbol {
    Wicket,
    Four,
    Six,
    Dot,
    Runs(u32),
}

impl DeliverySymbol {
    fn render(&self) -> String {
        match self {
            DeliverySymbol::Wicket => "W".to_string(),
            DeliverySymbol::Four => "4".to_string(),
            DeliverySymbol::Six => "6".to_string(),
            DeliverySymbol::Dot => ".".to_string(),
            DeliverySymbol::Runs(n) => n.to_string(),
        }
    }
}

/// Rolling tally for one batter.
#[derive(Debug, Clone, Default)]
struct BatterTally {
    runs: u32,
    balls: u32,
    fours: u32,
    sixes: u32,
    recent: VecDeque<u32>,
}

/// Rolling tally for one bowler.
#[derive(Debug, Clone, Default)]
struct BowlerTally {
    overs: u32,
    maidens: u32,
    runs: u32,
    wickets: u32,
    balls_this_over: u32,
    runs_this_over: u32,
    spell_overs: u32,
    spell_wickets: u32,
    spell_runs: u32,
    recent: VecDeque<DeliverySymbol>,
}

/// Builds one `RichContext` per delivery from the ordered event stream.
///
/// Optionally integrates a stats provider for head-to-head matchups and a
/// retrieval provider for historical parallels; both are fail-soft.
pub struct ContextBuilder {
    match_info: MatchInfo,
    config: EngineConfig,
    pressure_calc: PressureCalculator,
    narrative_tracker: NarrativeTracker,
    stats_provider: Option<Box<dyn StatsProvider>>,
    retrieval_provider: Option<Box<dyn RetrievalProvider>>,

    innings_number: u8,
    total_runs: u32,
    total_wickets: u8,
    overs_completed: f64,
    balls_in_innings: u32,
    target: Option<u32>,

    // Ordering guard
    last_ball: Option<BallNumber>,
    last_snapshot_runs: Option<u32>,

    batters: HashMap<String, BatterTally>,
    bowlers: HashMap<String, BowlerTally>,
    last_bowler: Option<String>,

    partnership_runs: u32,
    partnership_balls: u32,
    partnership_batter1: Option<String>,
    partnership_batter2: Option<String>,

    recent: RecentWindow,
    balls_since_boundary: u32,
    balls_since_wicket: u32,

    // Survives new_innings: repetition avoidance is per match, not per innings
    recent_phrases: VecDeque<String>,
}

impl ContextBuilder {
    /// Create a builder for the first innings of a match.
    pub fn new(match_info: MatchInfo) -> Self {
        Self::with_config(match_info, EngineConfig::default())
    }

    /// Create a builder with explicit engine configuration.
    pub fn with_config(match_info: MatchInfo, config: EngineConfig) -> Self {
        let window = RecentWindow::new(config.window_balls);
        Self {
            match_info,
            config,
            pressure_calc: PressureCalculator::new(),
            narrative_tracker: NarrativeTracker::new(),
            stats_provider: None,
            retrieval_provider: None,
            innings_number: 1,
            total_runs: 0,
            total_wickets: 0,
            overs_completed: 0.0,
            balls_in_innings: 0,
            target: None,
            last_ball: None,
            last_snapshot_runs: None,
            batters: HashMap::new(),
            bowlers: HashMap::new(),
            last_bowler: None,
            partnership_runs: 0,
            partnership_balls: 0,
            partnership_batter1: None,
            partnership_batter2: None,
            recent: window,
            balls_since_boundary: 0,
            balls_since_wicket: 0,
            recent_phrases: VecDeque::new(),
        }
    }

    /// Attach a head-to-head stats provider.
    pub fn with_stats_provider(mut self, provider: Box<dyn StatsProvider>) -> Self {
        self.stats_provider = Some(provider);
        self
    }

    /// Attach a historical-parallel retrieval provider.
    pub fn with_retrieval_provider(mut self, provider: Box<dyn RetrievalProvider>) -> Self {
        self.retrieval_provider = Some(provider);
        self
    }

    /// Build the rich context for the next delivery in order.
    ///
    /// Precondition: `event` is the next event of this innings, processed
    /// exactly once. Out-of-order or replayed deliveries are rejected before
    /// any aggregate is touched.
    pub fn build(&mut self, event: &DeliveryEvent) -> Result<RichContext, ContextError> {
        self.validate(event)?;
        self.update_state(event);

        let situation = self.build_match_situation();
        let batter = self.build_batter_context(event);
        let bowler = self.build_bowler_context(event);
        let partnership = self.build_partnership_context();
        let recent = self.build_recent_events();

        let (pressure_level, pressure_score) = self.pressure_calc.calculate(
            &situation,
            self.recent.wickets(),
            batter.is_new_batter(),
            self.balls_since_boundary,
        );

        let batter_tally = self.batters.get(&event.batter).cloned().unwrap_or_default();
        let bowler_wickets = self
            .bowlers
            .get(&event.bowler)
            .map_or(0, |tally| tally.wickets);
        let mut narrative = self.narrative_tracker.update(
            event,
            batter_tally.runs,
            batter_tally.balls,
            bowler_wickets,
            self.partnership_runs,
        );

        self.enrich(event, &situation, pressure_level, &mut narrative);

        Ok(RichContext {
            event: event.clone(),
            situation,
            batter,
            bowler,
            partnership,
            recent,
            narrative,
            pressure: pressure_level,
            pressure_score,
            suggested_tone: suggested_tone(event, pressure_level),
            suggested_length: suggested_length(event),
            avoid_phrases: self
                .recent_phrases
                .iter()
                .rev()
                .take(self.config.phrases_per_snapshot)
                .rev()
                .cloned()
                .collect(),
        })
    }

    /// Set the chase target for this innings.
    pub fn set_target(&mut self, target: u32) {
        self.target = Some(target);
    }

    /// Reset every innings-scoped aggregate for a new innings.
    /// Phrase-avoidance history deliberately survives.
    pub fn new_innings(&mut self, innings_number: u8) {
        debug!("resetting context builder for innings {}", innings_number);
        self.innings_number = innings_number;
        self.total_runs = 0;
        self.total_wickets = 0;
        self.overs_completed = 0.0;
        self.balls_in_innings = 0;
        self.target = None;
        self.last_ball = None;
        self.last_snapshot_runs = None;
        self.batters.clear();
        self.bowlers.clear();
        self.last_bowler = None;
        self.partnership_runs = 0;
        self.partnership_balls = 0;
        self.partnership_batter1 = None;
        self.partnership_batter2 = None;
        self.recent.clear();
        self.balls_since_boundary = 0;
        self.balls_since_wicket = 0;
        self.narrative_tracker.reset();
    }

    /// Remember a phrase the generator should avoid repeating.
    pub fn add_phrase_to_avoid(&mut self, phrase: impl Into<String>) {
        self.recent_phrases.push_back(phrase.into());
        while self.recent_phrases.len() > self.config.phrase_history {
            self.recent_phrases.pop_front();
        }
    }

    fn validate(&self, event: &DeliveryEvent) -> Result<(), ContextError> {
        if let Some(previous) = self.last_ball {
            if event.ball_number <= previous {
                return Err(ContextError::OutOfOrderDelivery {
                    previous,
                    current: event.ball_number,
                });
            }
        }

        if event.is_wicket && self.total_wickets >= 10 {
            return Err(ContextError::WicketsExhausted {
                ball: event.ball_number,
            });
        }

        if let Some(previous) = self.last_snapshot_runs {
            if event.score.runs < previous {
                return Err(ContextError::ScoreRegression {
                    ball: event.ball_number,
                    previous,
                    current: event.score.runs,
                });
            }
        }

        Ok(())
    }

    fn update_state(&mut self, event: &DeliveryEvent) {
        self.last_ball = Some(event.ball_number);
        self.last_snapshot_runs = Some(event.score.runs);

        self.total_runs += event.runs_total;

        let legal = event.is_legal_delivery();
        if legal {
            self.balls_in_innings += 1;
        }
        self.overs_completed =
            f64::from(self.balls_in_innings / 6) + f64::from(self.balls_in_innings % 6) / 10.0;

        if event.is_boundary {
            self.balls_since_boundary = 0;
        } else {
            self.balls_since_boundary += 1;
        }

        if event.is_wicket {
            self.total_wickets += 1;
            self.balls_since_wicket = 0;
        } else {
            self.balls_since_wicket += 1;
        }

        self.update_batter_stats(event, legal);
        self.update_bowler_stats(event, legal);
        self.update_partnership(event, legal);

        self.recent.push(event.clone());
    }

    fn update_batter_stats(&mut self, event: &DeliveryEvent, legal: bool) {
        let tally = self.batters.entry(event.batter.clone()).or_default();
        tally.runs += event.runs_batter;
        if legal {
            tally.balls += 1;
        }
        tally.recent.push_back(event.runs_batter);
        while tally.recent.len() > self.config.form_balls {
            tally.recent.pop_front();
        }
        match event.runs_batter {
            4 => tally.fours += 1,
            6 => tally.sixes += 1,
            _ => {}
        }
    }

    fn update_bowler_stats(&mut self, event: &DeliveryEvent, legal: bool) {
        // A change of bowler starts a fresh spell for whoever is now on
        if self.last_bowler.as_deref() != Some(event.bowler.as_str()) {
            let tally = self.bowlers.entry(event.bowler.clone()).or_default();
            tally.spell_overs = 0;
            tally.spell_wickets = 0;
            tally.spell_runs = 0;
            self.last_bowler = Some(event.bowler.clone());
        }

        let tally = self.bowlers.entry(event.bowler.clone()).or_default();
        tally.runs += event.runs_total;
        tally.runs_this_over += event.runs_total;
        tally.spell_runs += event.runs_total;
        if legal {
            tally.balls_this_over += 1;
        }

        let symbol = if event.is_wicket {
            tally.wickets += 1;
            tally.spell_wickets += 1;
            DeliverySymbol::Wicket
        } else if event.runs_batter == 4 {
            DeliverySymbol::Four
        } else if event.runs_batter == 6 {
            DeliverySymbol::Six
        } else if event.runs_total == 0 {
            DeliverySymbol::Dot
        } else {
            DeliverySymbol::Runs(event.runs_total)
        };
        tally.recent.push_back(symbol);
        while tally.recent.len() > self.config.form_balls {
            tally.recent.pop_front();
        }

        // Over complete after six legal deliveries
        if tally.balls_this_over == 6 {
            tally.overs += 1;
            tally.spell_overs += 1;
            if tally.runs_this_over == 0 {
                tally.maidens += 1;
            }
            tally.balls_this_over = 0;
            tally.runs_this_over = 0;
        }
    }

    fn update_partnership(&mut self, event: &DeliveryEvent, legal: bool) {
        if event.is_wicket {
            // Dismissed batter leaves; the non-striker anchors the new stand
            // until the incoming batter takes a delivery.
            self.partnership_runs = 0;
            self.partnership_balls = 0;
            self.partnership_batter1 = Some(event.non_striker.clone());
            self.partnership_batter2 = None;
            return;
        }

        if self.partnership_batter1.is_none() {
            self.partnership_batter1 = Some(event.batter.clone());
            self.partnership_batter2 = Some(event.non_striker.clone());
        } else if self.partnership_batter2.is_none()
            && self.partnership_batter1.as_deref() != Some(event.batter.as_str())
        {
            self.partnership_batter2 = Some(event.batter.clone());
        }

        self.partnership_runs += event.runs_batter;
        if legal {
            self.partnership_balls += 1;
        }
    }

    fn build_match_situation(&self) -> MatchSituation {
        let current_run_rate = if self.overs_completed > 0.0 {
            f64::from(self.total_runs) / self.overs_completed
        } else {
            0.0
        };

        let mut runs_required = None;
        let mut required_rate = None;
        let mut balls_remaining = None;

        if let Some(target) = self.target {
            let required = i64::from(target) - i64::from(self.total_runs);
            runs_required = Some(required);
            if let Some(total_overs) = self.match_info.format.total_overs() {
                let remaining = (total_overs * 6).saturating_sub(self.balls_in_innings);
                balls_remaining = Some(remaining);
                if remaining > 0 {
                    let overs_remaining = f64::from(remaining) / 6.0;
                    required_rate = Some(required as f64 / overs_remaining);
                }
            }
        }

        MatchSituation {
            batting_team: self.match_info.batting_team(self.innings_number).to_string(),
            bowling_team: self.match_info.bowling_team(self.innings_number).to_string(),
            innings_number: self.innings_number,
            total_runs: self.total_runs,
            total_wickets: self.total_wickets,
            overs_completed: self.overs_completed,
            balls_remaining,
            target: self.target,
            runs_required,
            required_rate,
            current_run_rate,
            phase: self.detect_phase(),
            match_format: self.match_info.format,
        }
    }

    fn detect_phase(&self) -> MatchPhase {
        match self.match_info.format {
            MatchFormat::T20 => {
                if self.overs_completed <= 6.0 {
                    MatchPhase::Powerplay
                } else if self.overs_completed <= 15.0 {
                    MatchPhase::MiddleOvers
                } else {
                    MatchPhase::DeathOvers
                }
            }
            MatchFormat::Odi => {
                if self.overs_completed <= 10.0 {
                    MatchPhase::Powerplay
                } else if self.overs_completed <= 40.0 {
                    MatchPhase::MiddleOvers
                } else {
                    MatchPhase::DeathOvers
                }
            }
            // T20I and Test share the generic ball-count routing
            MatchFormat::Test | MatchFormat::T20I => {
                if self.balls_in_innings < 180 {
                    MatchPhase::EarlyInnings
                } else if self.balls_in_innings < 360 {
                    MatchPhase::MiddleInnings
                } else {
                    MatchPhase::LateInnings
                }
            }
        }
    }

    fn build_batter_context(&self, event: &DeliveryEvent) -> BatterContext {
        let tally = self.batters.get(&event.batter).cloned().unwrap_or_default();

        let strike_rate = if tally.balls > 0 {
            f64::from(tally.runs) / f64::from(tally.balls) * 100.0
        } else {
            0.0
        };

        // First milestone within a 15-run horizon; an exact milestone score
        // is deliberately not flagged (reached, not approaching).
        let mut approaching_milestone = None;
        let mut runs_to_milestone = None;
        for m in MILESTONES {
            if tally.runs < m && m <= tally.runs + 15 {
                approaching_milestone = Some(m.to_string());
                runs_to_milestone = Some(m - tally.runs);
                break;
            }
        }

        let dot_ball_pressure = tally
            .recent
            .iter()
            .rev()
            .take_while(|&&runs| runs == 0)
            .count() as u32;

        BatterContext {
            name: event.batter.clone(),
            runs_scored: tally.runs,
            balls_faced: tally.balls,
            fours: tally.fours,
            sixes: tally.sixes,
            strike_rate,
            is_on_strike: true,
            approaching_milestone,
            runs_to_milestone,
            recent_scoring: tally.recent.iter().copied().collect(),
            dot_ball_pressure,
        }
    }

    fn build_bowler_context(&self, event: &DeliveryEvent) -> BowlerContext {
        let tally = self.bowlers.get(&event.bowler).cloned().unwrap_or_default();

        let overs_bowled = f64::from(tally.overs) + f64::from(tally.balls_this_over) / 10.0;
        let economy = if tally.overs > 0 {
            f64::from(tally.runs) / f64::from(tally.overs)
        } else {
            0.0
        };

        let recent: Vec<_> = tally.recent.iter().collect();
        let is_on_hat_trick = recent.len() >= 2
            && recent[recent.len() - 1] == &DeliverySymbol::Wicket
            && recent[recent.len() - 2] == &DeliverySymbol::Wicket;

        let consecutive_dots = tally
            .recent
            .iter()
            .rev()
            .take_while(|&&symbol| symbol == DeliverySymbol::Dot)
            .count() as u32;

        BowlerContext {
            name: event.bowler.clone(),
            overs_bowled,
            maidens: tally.maidens,
            runs_conceded: tally.runs,
            wickets: tally.wickets,
            economy,
            current_spell_overs: f64::from(tally.spell_overs)
                + f64::from(tally.balls_this_over) / 10.0,
            current_spell_wickets: tally.spell_wickets,
            current_spell_runs: tally.spell_runs,
            recent_deliveries: tally.recent.iter().map(DeliverySymbol::render).collect(),
            is_on_hat_trick,
            consecutive_dots,
        }
    }

    fn build_partnership_context(&self) -> PartnershipContext {
        let run_rate = if self.partnership_balls > 0 {
            f64::from(self.partnership_runs) / (f64::from(self.partnership_balls) / 6.0)
        } else {
            0.0
        };

        PartnershipContext {
            runs: self.partnership_runs,
            balls: self.partnership_balls,
            batter1_name: self.partnership_batter1.clone().unwrap_or_default(),
            batter2_name: self.partnership_batter2.clone().unwrap_or_default(),
            run_rate,
            is_rebuilding: self.recent.wickets() >= 2 && self.partnership_runs < 30,
            is_dominant: self.partnership_runs >= 50 && run_rate >= 6.0,
        }
    }

    fn build_recent_events(&self) -> RecentEvents {
        let last_wicket_description = self.recent.last_wicket().map(|e| {
            let kind = e.wicket_kind.map_or("out", |k| k.as_str());
            format!("{} {} by {}", e.batter, kind, e.bowler)
        });

        let last_six = self.recent.last_n(6);
        let last_over_summary = last_six
            .iter()
            .map(|e| {
                if e.is_wicket {
                    "W".to_string()
                } else if e.runs_total > 0 {
                    e.runs_total.to_string()
                } else {
                    ".".to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        RecentEvents {
            last_six_balls: last_six,
            last_over_summary,
            wickets_in_last_5_overs: self.recent.wickets(),
            boundaries_in_last_5_overs: self.recent.boundaries(),
            runs_in_last_5_overs: self.recent.runs(),
            last_wicket_description,
            balls_since_last_boundary: self.balls_since_boundary,
            balls_since_last_wicket: self.balls_since_wicket,
        }
    }

    /// Merge optional stats and retrieval results into the narrative state.
    /// Any collaborator failure is logged and treated as absence.
    fn enrich(
        &mut self,
        event: &DeliveryEvent,
        situation: &MatchSituation,
        pressure: PressureLevel,
        narrative: &mut NarrativeState,
    ) {
        let budget = self.config.enrichment_budget();

        if let Some(stats) = &self.stats_provider {
            match stats.head_to_head(&event.batter, &event.bowler, budget) {
                Ok(Some(record)) if record.balls_faced >= 10 => {
                    narrative.matchup_context = Some(record.to_short_context());
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(
                        "stats enrichment failed for {} vs {}: {}",
                        event.batter, event.bowler, err
                    );
                }
            }
        }

        if let Some(retrieval) = &self.retrieval_provider {
            match retrieval.retrieve(event, situation, pressure, budget) {
                Ok(mut callbacks) => {
                    // Historical parallels outrank the tracker's own callbacks
                    callbacks.append(&mut narrative.callbacks_available);
                    callbacks.truncate(self.config.max_callbacks);
                    narrative.callbacks_available = callbacks;
                }
                Err(err) => warn!("retrieval enrichment failed: {}", err),
            }
        }
    }
}

fn suggested_tone(event: &DeliveryEvent, pressure: PressureLevel) -> CommentaryTone {
    if event.is_wicket {
        return CommentaryTone::Dramatic;
    }
    match event.runs_batter {
        6 => CommentaryTone::Excited,
        4 => CommentaryTone::Enthusiastic,
        _ => match pressure {
            PressureLevel::Critical | PressureLevel::Intense => CommentaryTone::Tense,
            PressureLevel::Calm => CommentaryTone::Calm,
            _ => CommentaryTone::Neutral,
        },
    }
}

fn suggested_length(event: &DeliveryEvent) -> CommentaryLength {
    if event.is_wicket {
        CommentaryLength::Long
    } else if event.is_boundary {
        CommentaryLength::Medium
    } else if event.runs_total == 0 {
        CommentaryLength::Short
    } else {
        CommentaryLength::Medium
    }
}

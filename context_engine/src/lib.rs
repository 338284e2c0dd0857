//! # Context Engine (Midwicket)
//!
//! The "brain" of the commentary pipeline. This crate consumes the ordered
//! delivery stream from `match_events`, maintains per-innings aggregates, and
//! produces one immutable situational snapshot per delivery for downstream
//! prompt and speech generators.
//!
//! ## Core Components
//!
//! - **snapshot**: Value types describing match, player, partnership, and
//!   narrative state
//! - **pressure**: Pure multi-factor heuristic scoring of match pressure
//! - **narrative**: Momentum state machine and storyline tracking
//! - **builder**: The stateful orchestrator assembling `RichContext` per ball
//!
//! ## Design Philosophy
//!
//! - **Incremental**: Every aggregate is updated in O(1) per delivery; nothing
//!   is recomputed from scratch
//! - **Fail-soft at the edges**: Optional stats/retrieval collaborators can
//!   never break snapshot production
//! - **One builder per innings**: Aggregates are innings-scoped and reset
//!   explicitly via `new_innings`

pub mod builder;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod narrative;
pub mod pressure;
pub mod snapshot;

pub use builder::*;
pub use collaborators::*;
pub use config::*;
pub use error::*;
pub use narrative::*;
pub use pressure::*;
pub use snapshot::*;

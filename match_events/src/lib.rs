//! # Match Events
//!
//! The "Scorebook" crate - contains the delivery event types, score state, and
//! match metadata consumed by the context engine. This crate is the single
//! source of truth for what happened on the field and does not contain any
//! aggregation or narrative logic.

pub mod events;
pub mod match_info;

pub use events::*;
pub use match_info::*;

//! Central unit bus polling
//!
//! Terminals never talk unless addressed; the engine walks the device ids
//! in strict round-robin order, one transaction at a time.

pub mod engine;
pub mod stats;

pub use engine::{PollError, PollOutcome, PollingEngine};
pub use stats::PollStats;

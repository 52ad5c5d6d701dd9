//! Wall terminal logic
//!
//! Keypad decoding, press classification, trimmer tracking and the bus
//! responder. The terminal firmware samples the analog inputs and feeds
//! bus bytes; everything else happens here.

pub mod classifier;
pub mod keypad;
pub mod responder;
pub mod trimmer;

pub use classifier::ButtonClassifier;
pub use keypad::{AdcMeanTracker, AnalogKeypad};
pub use responder::TerminalResponder;
pub use trimmer::TrimmerTracker;

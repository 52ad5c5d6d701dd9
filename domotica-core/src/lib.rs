//! Board-agnostic core logic for the Domotica installation
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Seam traits for the bus port and the zone outputs
//! - Round-robin bus polling engine (central unit)
//! - Zone dispatcher with gamma-corrected dimming (central unit)
//! - Keypad decoding, press classification and bus responder (terminal)
//! - Configuration types, zone table and keymap

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod dispatch;
pub mod polling;
pub mod terminal;
pub mod traits;

//! Zone output drivers
//!
//! Concrete outputs behind the central unit's zones, written against the
//! `domotica-hal` traits:
//!
//! - [`fade::FadeBank`] - dimmable zones with timed linear fades
//! - [`digital::DigitalBank`] - on/off zones (GPIO or relay board)
//! - [`adapters`] - `embedded-hal` peripherals as HAL outputs

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

use domotica_core::config::ZoneId;

pub mod adapters;
pub mod digital;
pub mod fade;

pub use digital::{DigitalBank, DigitalOutput};
pub use fade::{FadeBank, FadeChannel};

/// Errors binding outputs to zones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BankError {
    /// No room for another output
    Full,
    /// Zone already has an output
    Duplicate(ZoneId),
}

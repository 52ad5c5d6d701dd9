//! RP2040-specific HAL for the central unit
//!
//! This crate provides RP2040-specific implementations of the shared
//! `domotica-hal` and `domotica-core` traits:
//!
//! - RS-485 master port over a buffered UART (implements `BusPort`)
//! - UART line settings conversion
//! - PWM slice configuration for dimmable zones

#![no_std]

pub mod pwm;
pub mod rs485;
pub mod uart;

pub use rs485::Rs485Master;

//! Domotica Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific HALs (RP2040, STM32F0). Drivers in `domotica-drivers`
//! are written against these traits and tested on the host with mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (domotica-firmware, etc.)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  domotica-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ domotica-hal- │       │ domotica-hal- │
//! │    rp2040     │       │   stm32f0     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital outputs (relays, RS-485 direction)
//! - [`pwm::PwmOutput`] - Dimmable outputs
//! - [`adc::to_10bit`] - Keypad ladder and trimmer scaling
//! - [`uart::UartConfig`] - RS-485 line settings

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod adc;
pub mod gpio;
pub mod pwm;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use pwm::PwmOutput;
pub use uart::UartConfig;

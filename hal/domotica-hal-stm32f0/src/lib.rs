//! STM32F0-specific HAL for the wall terminals
//!
//! This crate provides STM32F0-specific implementations and utilities
//! for use with `domotica-hal` traits. It supports:
//!
//! - STM32F042F6 / STM32F042K6 (wall terminal MCU)
//!
//! # Features
//!
//! - `stm32f042f6`, `stm32f042k6` - Chip selection
//! - `defmt` - Enable debug formatting support
//!
//! # Usage
//!
//! The terminal firmware uses embassy-stm32 directly for peripheral setup
//! and this crate for the RS-485 reply path and line settings.

#![no_std]

pub mod rs485;
pub mod uart;

pub use rs485::Rs485Terminal;
pub use uart::UartBusError;

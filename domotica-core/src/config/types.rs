//! Configuration type definitions
//!
//! Timing and calibration settings for the bus, the dimmer and the wall
//! terminals. The central unit loads these from its installation file;
//! terminals compile them in.

use heapless::Vec;

use domotica_protocol::MAX_BUTTONS;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Terminals polled by a stock installation
pub const DEFAULT_TERMINAL_COUNT: u8 = 13;

/// Full-scale value of the 10-bit analog inputs
pub const ADC_MAX: u16 = 1023;

/// RS-485 bus settings (central unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusConfig {
    /// Number of terminals to poll; 0 disables polling
    pub terminal_count: u8,
    /// Wait for the id echo after a poll byte (ms)
    pub poll_timeout_ms: u32,
    /// Wait for the report payload after the echo (ms)
    pub conn_timeout_ms: u32,
    /// Line rate
    pub baudrate: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            terminal_count: DEFAULT_TERMINAL_COUNT,
            poll_timeout_ms: 30,
            conn_timeout_ms: 100,
            baudrate: 9600,
        }
    }
}

/// Dimmer behaviour for PWM zones
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DimmingConfig {
    /// Fade time for every PWM change (ms)
    pub fade_ms: u16,
    /// Perceptual correction exponent
    pub gamma: f32,
    /// Linear duty restored when a zone is switched on after being dimmed to zero
    pub default_duty: u16,
}

impl Default for DimmingConfig {
    fn default() -> Self {
        Self {
            fade_ms: 500,
            gamma: 2.2,
            default_duty: 512,
        }
    }
}

/// Resistor-ladder keypad calibration.
///
/// Each button pulls the shared analog line to a distinct level; a sample
/// belongs to button `n` when it lies within `interval` of `means[n - 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeypadConfig {
    /// Samples at or above this level mean no button is pressed
    pub valid_edge: u16,
    /// Half-width of each button window
    pub interval: u16,
    /// Window centre per button
    pub means: Vec<u16, MAX_BUTTONS>,
}

impl Default for KeypadConfig {
    fn default() -> Self {
        let mut means = Vec::new();
        let _ = means.push(79);
        let _ = means.push(143);
        Self {
            valid_edge: ADC_MAX - 100,
            interval: 20,
            means,
        }
    }
}

/// Wall terminal behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TerminalConfig {
    /// Bus address
    pub device_id: u8,
    /// Pause after a button detection before sampling again (ms)
    pub debounce_ms: u32,
    /// Consecutive detections after which a press counts as held
    pub held_threshold: u8,
    /// Quiet time after the last input before the terminal answers a poll (ms)
    pub lock_ms: u32,
    /// Trimmer movement (ADC steps) that counts as a change
    pub trimmer_detect: u16,
    /// Sampling period while no button is down (ms)
    pub sample_period_ms: u32,
    pub keypad: KeypadConfig,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            debounce_ms: 200,
            held_threshold: 5,
            lock_ms: 500,
            trimmer_detect: 5,
            sample_period_ms: 10,
            keypad: KeypadConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_defaults() {
        let bus = BusConfig::default();
        assert_eq!(bus.terminal_count, 13);
        assert_eq!(bus.poll_timeout_ms, 30);
        assert_eq!(bus.conn_timeout_ms, 100);
    }

    #[test]
    fn test_terminal_defaults() {
        let terminal = TerminalConfig::default();
        assert_eq!(terminal.debounce_ms, 200);
        assert_eq!(terminal.held_threshold, 5);
        assert_eq!(terminal.lock_ms, 500);
        assert_eq!(terminal.keypad.valid_edge, 923);
        assert_eq!(terminal.keypad.means.as_slice(), &[79, 143]);
    }

    #[test]
    fn test_dimming_defaults() {
        let dimming = DimmingConfig::default();
        assert_eq!(dimming.fade_ms, 500);
        assert_eq!(dimming.default_duty, 512);
    }
}

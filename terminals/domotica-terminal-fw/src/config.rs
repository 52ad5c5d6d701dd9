//! Compiled-in terminal settings
//!
//! Every terminal runs the same image except for its bus address, taken
//! from `TERMINAL_DEVICE_ID` at build time:
//!
//! ```text
//! TERMINAL_DEVICE_ID=5 cargo build -p domotica-terminal-fw --release
//! ```

use domotica_core::config::TerminalConfig;
use domotica_protocol::MAX_DEVICES;

/// Bus address of this terminal (defaults to 0)
pub const DEVICE_ID: u8 = parse_device_id(option_env!("TERMINAL_DEVICE_ID"));

/// Bus line rate; must match the central unit's installation
pub const BAUDRATE: u32 = 9600;

/// ADC resolution on the STM32F0
pub const ADC_BITS: u8 = 12;

/// Samples per logged mean in keypad-tuner builds
#[cfg(feature = "keypad-tuner")]
pub const TUNER_WINDOW: u32 = 100;

const fn parse_device_id(raw: Option<&str>) -> u8 {
    let Some(raw) = raw else {
        return 0;
    };
    let bytes = raw.as_bytes();
    if bytes.is_empty() {
        panic!("TERMINAL_DEVICE_ID is empty");
    }
    let mut value: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        if !digit.is_ascii_digit() {
            panic!("TERMINAL_DEVICE_ID must be a decimal number");
        }
        value = value * 10 + (digit - b'0') as u32;
        if value >= MAX_DEVICES as u32 {
            panic!("TERMINAL_DEVICE_ID must be below 128");
        }
        i += 1;
    }
    value as u8
}

/// Terminal behaviour with this image's address
pub fn terminal_config() -> TerminalConfig {
    TerminalConfig {
        device_id: DEVICE_ID,
        ..TerminalConfig::default()
    }
}

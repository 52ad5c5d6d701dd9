//! Configuration loading and parsing
//!
//! The installation layout is embedded at build time and parsed at boot by
//! a custom no_std parser. The built-in layout is used if parsing fails.

pub mod toml;

use defmt::*;

use domotica_core::config::{
    default_keymap, default_zone_table, BusConfig, DimmingConfig, KeymapError,
};

pub use self::toml::{parse_installation, Installation, ParseError};

/// Embedded installation file (compiled into firmware)
/// Edit installation.toml and rebuild to customize
const EMBEDDED_INSTALLATION: &str = include_str!("../../installation.toml");

/// Load the embedded installation, falling back to the built-in layout
pub fn load_installation() -> Result<Installation, KeymapError> {
    match parse_installation(EMBEDDED_INSTALLATION) {
        Ok(installation) => {
            info!(
                "Installation loaded: {} terminals, {} zones",
                installation.bus.terminal_count,
                installation.zones.len()
            );
            Ok(installation)
        }
        Err(e) => {
            // build.rs validates the file, so this only happens when the
            // validator and this parser disagree
            error!("Failed to parse installation.toml: {:?}", e);
            error!("Using built-in installation");
            builtin_installation()
        }
    }
}

/// Stock wiring with default timings
pub fn builtin_installation() -> Result<Installation, KeymapError> {
    let zones = default_zone_table();
    let keymap = default_keymap(&zones)?;
    Ok(Installation {
        bus: BusConfig::default(),
        dimming: DimmingConfig::default(),
        zones,
        keymap,
    })
}

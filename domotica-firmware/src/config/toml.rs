//! Simple TOML parser for the installation file
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! the installation layout. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (integer, float, array of integers)
//! - [section] headers
//! - [terminal.N] headers
//! - Comments (# ...)
//!
//! Terminal sections bind zones per button (`button1 = [4]` for every
//! state, `button1_pressed`, `button1_double`, `button1_held` for one
//! state) and per trimmer (`trimmer = [4]`). Each binding drives at most
//! two zones. Later keys override earlier ones.

use alloc::vec::Vec;

use domotica_core::config::{
    BusConfig, DimmingConfig, KeymapBuilder, KeymapError, KeymapTable, ZoneError, ZoneId,
    ZoneKind, ZonePair, ZoneTable,
};
use domotica_protocol::{ButtonId, ButtonState};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid section header
    InvalidSection,
    /// Invalid value type
    InvalidValue,
    /// Too many zones in one binding
    TooManyItems,
    /// Zone id outside 1..=32
    InvalidZone,
    /// Zone listed twice
    Zone(ZoneError),
    /// Binding rejected by the keymap
    Keymap(KeymapError),
}

impl From<ZoneError> for ParseError {
    fn from(e: ZoneError) -> Self {
        ParseError::Zone(e)
    }
}

impl From<KeymapError> for ParseError {
    fn from(e: KeymapError) -> Self {
        ParseError::Keymap(e)
    }
}

/// Everything the central unit needs from the installation file
#[derive(Debug, Clone)]
pub struct Installation {
    pub bus: BusConfig,
    pub dimming: DimmingConfig,
    pub zones: ZoneTable,
    pub keymap: KeymapTable,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Root,
    Bus,
    Dimming,
    Zones,
    Terminal(u8),
}

/// Keymap entry, applied once the terminal count is known
#[derive(Debug, Clone, Copy)]
enum Binding {
    Button {
        device: u8,
        button: ButtonId,
        state: Option<ButtonState>,
        zones: ZonePair,
    },
    Trimmer {
        device: u8,
        zones: ZonePair,
    },
}

/// Parse the installation file
pub fn parse_installation(input: &str) -> Result<Installation, ParseError> {
    let mut section = Section::Root;
    let mut bus = BusConfig::default();
    let mut dimming = DimmingConfig::default();
    let mut zones = ZoneTable::new();
    let mut bindings: Vec<Binding> = Vec::new();

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let Some((key, value)) = parse_key_value(line) else {
            continue;
        };

        match section {
            Section::Root => {}
            Section::Bus => match key {
                "terminal_count" => bus.terminal_count = parse_int(value)?,
                "poll_timeout_ms" => bus.poll_timeout_ms = parse_int(value)?,
                "conn_timeout_ms" => bus.conn_timeout_ms = parse_int(value)?,
                "baudrate" => bus.baudrate = parse_int(value)?,
                _ => {} // Ignore unknown keys
            },
            Section::Dimming => match key {
                "fade_ms" => dimming.fade_ms = parse_int(value)?,
                "gamma" => dimming.gamma = parse_float(value)?,
                "default_duty" => dimming.default_duty = parse_int(value)?,
                _ => {}
            },
            Section::Zones => {
                let kind = match key {
                    "pwm" => ZoneKind::Pwm,
                    "digital" => ZoneKind::Digital,
                    _ => continue,
                };
                for zone in parse_zone_list(value)? {
                    zones.insert(zone, kind)?;
                }
            }
            Section::Terminal(device) => {
                if let Some(binding) = parse_binding(device, key, value)? {
                    bindings.push(binding);
                }
            }
        }
    }

    let mut builder = KeymapBuilder::new(bus.terminal_count)?;
    for binding in bindings {
        match binding {
            Binding::Button {
                device,
                button,
                state: Some(state),
                zones,
            } => builder.bind_button(device, button, state, zones)?,
            Binding::Button {
                device,
                button,
                state: None,
                zones,
            } => builder.bind_button_all_states(device, button, zones)?,
            Binding::Trimmer { device, zones } => builder.bind_trimmer(device, zones)?,
        }
    }
    let keymap = builder.build(&zones)?;

    Ok(Installation {
        bus,
        dimming,
        zones,
        keymap,
    })
}

/// Parse section header like "bus" or "terminal.3"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    let header = header.trim();

    if let Some(device) = header.strip_prefix("terminal.") {
        let device = device.parse().map_err(|_| ParseError::InvalidSection)?;
        return Ok(Section::Terminal(device));
    }

    match header {
        "bus" => Ok(Section::Bus),
        "dimming" => Ok(Section::Dimming),
        "zones" => Ok(Section::Zones),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Parse a key inside a terminal section
fn parse_binding(device: u8, key: &str, value: &str) -> Result<Option<Binding>, ParseError> {
    if key == "trimmer" {
        let zones = parse_zone_pair(value)?;
        return Ok(Some(Binding::Trimmer { device, zones }));
    }

    let Some(rest) = key.strip_prefix("button") else {
        return Ok(None);
    };
    let (number, state) = match rest.split_once('_') {
        Some((number, state)) => (number, Some(state)),
        None => (rest, None),
    };
    let button = number
        .parse()
        .ok()
        .and_then(ButtonId::from_number)
        .ok_or(ParseError::InvalidValue)?;
    let state = match state {
        None => None,
        Some("pressed") => Some(ButtonState::Pressed),
        Some("double") => Some(ButtonState::DoublePressed),
        Some("held") => Some(ButtonState::Held),
        Some(_) => return Err(ParseError::InvalidValue),
    };
    let zones = parse_zone_pair(value)?;

    Ok(Some(Binding::Button {
        device,
        button,
        state,
        zones,
    }))
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = match value.find('#') {
        Some(hash_pos) => value[..hash_pos].trim(),
        None => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a float value
fn parse_float(value: &str) -> Result<f32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse an array of zone ids like "[1, 2, 17]"
fn parse_zone_list(value: &str) -> Result<Vec<ZoneId>, ParseError> {
    let value = value.trim();
    if !value.starts_with('[') || !value.ends_with(']') {
        return Err(ParseError::InvalidValue);
    }
    let inner = &value[1..value.len() - 1];

    let mut zones = Vec::new();
    for item in inner.split(',') {
        let item = item.trim();
        // Trailing comma
        if item.is_empty() {
            continue;
        }
        let id: u8 = parse_int(item)?;
        zones.push(ZoneId::new(id).ok_or(ParseError::InvalidZone)?);
    }
    Ok(zones)
}

/// Parse a binding of up to two zones
fn parse_zone_pair(value: &str) -> Result<ZonePair, ParseError> {
    match parse_zone_list(value)?.as_slice() {
        [] => Ok(ZonePair::EMPTY),
        [zone] => Ok(ZonePair::single(*zone)),
        [first, second] => Ok(ZonePair::pair(*first, *second)),
        _ => Err(ParseError::TooManyItems),
    }
}

//! Input-to-zone keymap.
//!
//! Every classified button state and every trimmer maps to up to two zones.
//! The table is assembled with [`KeymapBuilder`] and checked against the
//! [`ZoneTable`] once; lookups afterwards cannot fail, a missing binding is
//! simply an empty [`ZonePair`].

use heapless::Vec;

use domotica_protocol::{ButtonId, ButtonState, DeviceId, MAX_BUTTONS, MAX_DEVICES};

use super::zones::{ZoneId, ZoneKind, ZoneTable};

/// Up to two zones driven by one input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ZonePair {
    first: Option<ZoneId>,
    second: Option<ZoneId>,
}

impl ZonePair {
    pub const EMPTY: ZonePair = ZonePair {
        first: None,
        second: None,
    };

    pub const fn single(zone: ZoneId) -> Self {
        Self {
            first: Some(zone),
            second: None,
        }
    }

    pub const fn pair(first: ZoneId, second: ZoneId) -> Self {
        Self {
            first: Some(first),
            second: Some(second),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.second.is_none()
    }

    /// Mapped zones in binding order
    pub fn zones(&self) -> impl Iterator<Item = ZoneId> {
        self.first.into_iter().chain(self.second)
    }
}

/// Bindings of a single terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TerminalKeymap {
    /// Indexed by button, then by non-idle state
    pub buttons: [[ZonePair; 3]; MAX_BUTTONS],
    pub trimmer: ZonePair,
}

/// Errors assembling a keymap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeymapError {
    /// More terminals than a 7-bit address can reach
    TooManyTerminals(u8),
    /// Binding for a device beyond the terminal count
    DeviceOutOfRange(u8),
    /// Bindings only exist for pressed, double-pressed and held
    IdleBinding,
    /// Binding references a zone missing from the zone table
    UnknownZone(ZoneId),
    /// Trimmers can only dim PWM zones
    NotDimmable(ZoneId),
}

/// Mutable keymap under construction
#[derive(Debug, Clone)]
pub struct KeymapBuilder {
    terminals: Vec<TerminalKeymap, MAX_DEVICES>,
}

impl KeymapBuilder {
    /// Start an empty keymap for `terminal_count` terminals
    pub fn new(terminal_count: u8) -> Result<Self, KeymapError> {
        if terminal_count as usize > MAX_DEVICES {
            return Err(KeymapError::TooManyTerminals(terminal_count));
        }
        let mut terminals = Vec::new();
        terminals
            .resize(terminal_count as usize, TerminalKeymap::default())
            .map_err(|_| KeymapError::TooManyTerminals(terminal_count))?;
        Ok(Self { terminals })
    }

    fn terminal_mut(&mut self, device: u8) -> Result<&mut TerminalKeymap, KeymapError> {
        self.terminals
            .get_mut(device as usize)
            .ok_or(KeymapError::DeviceOutOfRange(device))
    }

    /// Bind one button state
    pub fn bind_button(
        &mut self,
        device: u8,
        button: ButtonId,
        state: ButtonState,
        zones: ZonePair,
    ) -> Result<(), KeymapError> {
        let column = state.active_index().ok_or(KeymapError::IdleBinding)?;
        self.terminal_mut(device)?.buttons[button.index()][column] = zones;
        Ok(())
    }

    /// Bind pressed, double-pressed and held of one button to the same zones
    pub fn bind_button_all_states(
        &mut self,
        device: u8,
        button: ButtonId,
        zones: ZonePair,
    ) -> Result<(), KeymapError> {
        self.terminal_mut(device)?.buttons[button.index()] = [zones; 3];
        Ok(())
    }

    pub fn bind_trimmer(&mut self, device: u8, zones: ZonePair) -> Result<(), KeymapError> {
        self.terminal_mut(device)?.trimmer = zones;
        Ok(())
    }

    /// Validate every binding against the zone table and freeze the keymap
    pub fn build(self, zones: &ZoneTable) -> Result<KeymapTable, KeymapError> {
        for terminal in &self.terminals {
            for zone in terminal.buttons.iter().flatten().flat_map(ZonePair::zones) {
                if !zones.contains(zone) {
                    return Err(KeymapError::UnknownZone(zone));
                }
            }
            for zone in terminal.trimmer.zones() {
                match zones.kind(zone) {
                    Some(ZoneKind::Pwm) => {}
                    Some(ZoneKind::Digital) => return Err(KeymapError::NotDimmable(zone)),
                    None => return Err(KeymapError::UnknownZone(zone)),
                }
            }
        }
        Ok(KeymapTable {
            terminals: self.terminals,
        })
    }
}

/// Immutable, validated keymap
#[derive(Debug, Clone)]
pub struct KeymapTable {
    terminals: Vec<TerminalKeymap, MAX_DEVICES>,
}

impl KeymapTable {
    /// Number of terminals the keymap covers
    pub fn terminal_count(&self) -> u8 {
        self.terminals.len() as u8
    }

    pub fn contains_device(&self, device: DeviceId) -> bool {
        device.index() < self.terminals.len()
    }

    /// Zones bound to a button state; empty for idle or unknown devices
    pub fn button_zones(&self, device: DeviceId, button: ButtonId, state: ButtonState) -> ZonePair {
        let Some(column) = state.active_index() else {
            return ZonePair::EMPTY;
        };
        self.terminals
            .get(device.index())
            .map(|t| t.buttons[button.index()][column])
            .unwrap_or(ZonePair::EMPTY)
    }

    /// Zones dimmed by a terminal's trimmer
    pub fn trimmer_zones(&self, device: DeviceId) -> ZonePair {
        self.terminals
            .get(device.index())
            .map(|t| t.trimmer)
            .unwrap_or(ZonePair::EMPTY)
    }
}

//! Built-in installation layout.
//!
//! The stock house wiring: 12 light circuits, 4 relays, a fan controller and
//! a buzzer, with 13 wall terminals. Used when no installation file is
//! available and as a fixture in tests.

use domotica_protocol::ButtonId;

use super::keymap::{KeymapBuilder, KeymapError, KeymapTable, ZonePair};
use super::types::DEFAULT_TERMINAL_COUNT;
use super::zones::{ZoneId, ZoneKind, ZoneTable};

/// Named zones of the stock installation
pub mod zone {
    use super::ZoneId;

    const fn id(n: u8) -> ZoneId {
        match ZoneId::new(n) {
            Some(zone) => zone,
            None => panic!("zone id out of range"),
        }
    }

    pub const LED_1: ZoneId = id(1);
    pub const LED_2: ZoneId = id(2);
    pub const LED_3: ZoneId = id(3);
    pub const LED_4: ZoneId = id(4);
    pub const LED_5: ZoneId = id(5);
    pub const LED_6: ZoneId = id(6);
    pub const LED_7: ZoneId = id(7);
    pub const LED_8: ZoneId = id(8);
    pub const LED_9: ZoneId = id(9);
    pub const LED_10: ZoneId = id(10);
    pub const LED_11: ZoneId = id(11);
    pub const LED_12: ZoneId = id(12);
    pub const RELAY_1: ZoneId = id(13);
    pub const RELAY_2: ZoneId = id(14);
    pub const RELAY_3: ZoneId = id(15);
    pub const RELAY_4: ZoneId = id(16);
    pub const FAN_CONTROLLER: ZoneId = id(17);
    pub const BUZZER: ZoneId = id(18);
}

use zone::*;

const PWM_ZONES: [ZoneId; 11] = [
    LED_1, LED_2, LED_3, LED_4, LED_5, LED_6, LED_9, LED_10, LED_11, LED_12, FAN_CONTROLLER,
];

const DIGITAL_ZONES: [ZoneId; 7] = [LED_7, LED_8, RELAY_1, RELAY_2, RELAY_3, RELAY_4, BUZZER];

/// Button bindings per terminal; every state of a button drives the same zone
const BUTTONS: [[Option<ZoneId>; 3]; DEFAULT_TERMINAL_COUNT as usize] = [
    [Some(LED_4), None, None],
    [Some(LED_2), Some(LED_1), None],
    [Some(LED_3), None, None],
    [Some(LED_9), Some(LED_2), None],
    [Some(LED_2), Some(LED_10), None],
    [Some(LED_6), Some(LED_7), None],
    [Some(LED_8), Some(LED_7), None],
    [Some(LED_5), Some(LED_7), None],
    [Some(LED_7), Some(LED_1), None],
    [Some(LED_6), None, None],
    [Some(LED_7), None, None],
    [Some(LED_1), Some(LED_2), Some(LED_4)],
    [Some(LED_6), None, None],
];

const TRIMMERS: [Option<ZoneId>; DEFAULT_TERMINAL_COUNT as usize] = [
    Some(LED_4),
    Some(LED_2),
    None,
    None,
    Some(LED_10),
    Some(LED_6),
    None,
    Some(LED_5),
    None,
    Some(LED_6),
    None,
    Some(LED_1),
    Some(LED_6),
];

/// Zone table of the stock installation
pub fn default_zone_table() -> ZoneTable {
    let mut table = ZoneTable::new();
    for zone in PWM_ZONES {
        // Both lists are disjoint
        let _ = table.insert(zone, ZoneKind::Pwm);
    }
    for zone in DIGITAL_ZONES {
        let _ = table.insert(zone, ZoneKind::Digital);
    }
    table
}

/// Keymap of the stock installation
pub fn default_keymap(zones: &ZoneTable) -> Result<KeymapTable, KeymapError> {
    let mut builder = KeymapBuilder::new(DEFAULT_TERMINAL_COUNT)?;
    for (device, buttons) in BUTTONS.iter().enumerate() {
        for (button, zone) in ButtonId::ALL.into_iter().zip(buttons) {
            if let Some(zone) = zone {
                builder.bind_button_all_states(device as u8, button, ZonePair::single(*zone))?;
            }
        }
    }
    for (device, zone) in TRIMMERS.iter().enumerate() {
        if let Some(zone) = zone {
            builder.bind_trimmer(device as u8, ZonePair::single(*zone))?;
        }
    }
    builder.build(zones)
}

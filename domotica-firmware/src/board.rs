//! Central unit board wiring
//!
//! - RS-485: UART1 TX=GPIO20, RX=GPIO21, DE=GPIO22
//! - Dimmer outputs: GPIO0..GPIO11 (PWM slices 0..5, channels A and B)
//! - Relay outputs: GPIO12..GPIO19
//!
//! PWM zones of the installation take dimmer outputs in zone id order,
//! digital zones take relay outputs in zone id order.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::pwm::PwmOutput as RpPwmOutput;

use domotica_core::config::{ZoneKind, ZoneTable};
use domotica_drivers::adapters::{EhOutputPin, EhPwm};
use domotica_drivers::{DigitalBank, DigitalOutput, FadeBank};

/// Dimmer outputs on the board
pub const DIMMER_OUTPUTS: usize = 12;

/// Relay outputs on the board
pub const RELAY_OUTPUTS: usize = 8;

pub type ZonePwm = EhPwm<RpPwmOutput<'static>>;
pub type ZoneRelay = EhOutputPin<Output<'static>>;
pub type Dimmers = FadeBank<ZonePwm, DIMMER_OUTPUTS>;
pub type Relays = DigitalBank<ZoneRelay, RELAY_OUTPUTS>;

/// Assign dimmer outputs to the PWM zones
pub fn bind_dimmers(zones: &ZoneTable, outputs: impl IntoIterator<Item = ZonePwm>) -> Dimmers {
    let mut bank = Dimmers::new();
    let mut outputs = outputs.into_iter();
    for (zone, _) in zones.iter().filter(|(_, kind)| *kind == ZoneKind::Pwm) {
        let Some(output) = outputs.next() else {
            warn!("No dimmer output left for zone {}", zone.get());
            continue;
        };
        if let Err(e) = bank.bind(zone, output) {
            warn!("Zone {} not bound: {:?}", zone.get(), e);
        }
    }
    bank
}

/// Assign relay outputs to the digital zones
pub fn bind_relays(zones: &ZoneTable, outputs: impl IntoIterator<Item = ZoneRelay>) -> Relays {
    let mut bank = Relays::new();
    let mut outputs = outputs.into_iter();
    for (zone, _) in zones.iter().filter(|(_, kind)| *kind == ZoneKind::Digital) {
        let Some(output) = outputs.next() else {
            warn!("No relay output left for zone {}", zone.get());
            continue;
        };
        if let Err(e) = bank.bind(zone, DigitalOutput::new_active_high(output)) {
            warn!("Zone {} not bound: {:?}", zone.get(), e);
        }
    }
    bank
}

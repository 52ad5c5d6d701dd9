//! Zone actuator of the central unit
//!
//! PWM zones are queued to the dimmer task, which owns the PWM slices.
//! Relays switch immediately from the calling task.

use domotica_core::config::ZoneId;
use domotica_core::traits::{ActuationError, ZoneActuator};

use crate::board::Relays;
use crate::channels::{DimCommand, DimSender};

pub struct QueueActuator {
    dimmer: DimSender,
    relays: Relays,
}

impl QueueActuator {
    pub fn new(dimmer: DimSender, relays: Relays) -> Self {
        Self { dimmer, relays }
    }
}

impl ZoneActuator for QueueActuator {
    fn pwm_write_zone(&mut self, zone: ZoneId, duty: u16, fade_ms: u16) -> Result<(), ActuationError> {
        self.dimmer
            .try_send(DimCommand {
                zone,
                duty,
                fade_ms,
            })
            .map_err(|_| ActuationError::QueueFull)
    }

    fn gpio_write_zone(&mut self, zone: ZoneId, level: bool) -> Result<(), ActuationError> {
        self.relays.write(zone, level)
    }
}

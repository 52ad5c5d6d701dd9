//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Sender};

use domotica_core::config::ZoneId;

/// Channel capacity for dimmer commands
pub const DIM_CHANNEL_SIZE: usize = 10;

/// Fade request for one PWM zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DimCommand {
    pub zone: ZoneId,
    /// Target duty, 0..=1023
    pub duty: u16,
    pub fade_ms: u16,
}

/// Dimmer commands from the bus task to the dimmer task
pub static DIM_CHANNEL: Channel<CriticalSectionRawMutex, DimCommand, DIM_CHANNEL_SIZE> =
    Channel::new();

pub type DimSender = Sender<'static, CriticalSectionRawMutex, DimCommand, DIM_CHANNEL_SIZE>;

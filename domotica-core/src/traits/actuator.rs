//! Zone output traits

use crate::config::ZoneId;

/// Errors reported by zone outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuationError {
    /// Zone is not driven by this kind of output
    NotSupported,
    /// Command queue is full, the command was dropped
    QueueFull,
    /// Output hardware rejected the command
    Hardware,
}

/// Sink for zone commands
///
/// Both calls must return without waiting on hardware; PWM changes are
/// typically queued to the task that owns the PWM peripheral.
pub trait ZoneActuator {
    /// Fade a PWM zone to `duty` (0..=1023) over `fade_ms`
    fn pwm_write_zone(&mut self, zone: ZoneId, duty: u16, fade_ms: u16) -> Result<(), ActuationError>;

    /// Switch a digital zone
    fn gpio_write_zone(&mut self, zone: ZoneId, level: bool) -> Result<(), ActuationError>;
}

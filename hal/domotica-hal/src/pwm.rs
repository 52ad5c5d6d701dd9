//! PWM output abstraction

/// Single PWM channel
///
/// Duty is expressed in hardware counts, `0..=max_duty()`.
pub trait PwmOutput {
    /// Highest duty value (fully on)
    fn max_duty(&self) -> u16;

    /// Set the duty cycle; values above `max_duty()` saturate
    fn set_duty(&mut self, duty: u16);

    /// Current duty cycle
    fn duty(&self) -> u16;
}

/// Rescale `value` from `0..=from_max` to `0..=to_max`, rounding to nearest
pub fn scale_duty(value: u16, from_max: u16, to_max: u16) -> u16 {
    if from_max == 0 {
        return 0;
    }
    let value = value.min(from_max) as u32;
    ((value * to_max as u32 + from_max as u32 / 2) / from_max as u32) as u16
}

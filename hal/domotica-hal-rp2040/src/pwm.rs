//! PWM slices for dimmable zones
//!
//! Dimmable zones use both channels of each slice, so one slice drives two
//! zones on a shared carrier. With the system clock at 125 MHz and no
//! divider, a top of 9999 gives a 12.5 kHz carrier, well above visible
//! flicker.

use embassy_rp::pwm::Config;

/// Counter top; duty counts run `0..=PWM_TOP + 1`
pub const PWM_TOP: u16 = 9_999;

/// Slice configuration for a zone output, starting fully off
pub fn zone_config() -> Config {
    let mut config = Config::default();
    config.top = PWM_TOP;
    config.compare_a = 0;
    config.compare_b = 0;
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_config_starts_off() {
        let config = zone_config();
        assert_eq!(config.top, PWM_TOP);
        assert_eq!(config.compare_a, 0);
        assert_eq!(config.compare_b, 0);
    }
}

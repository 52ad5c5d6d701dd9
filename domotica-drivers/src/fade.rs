//! Software fades for PWM zones
//!
//! Zone duties are 10-bit levels (0..=1023). A [`FadeChannel`] moves its
//! output linearly from the current level to a target over the requested
//! time and rescales every step to the output's native resolution.
//!
//! # Usage
//!
//! The actuation task calls `update()` at a fixed tick:
//!
//! ```ignore
//! let mut bank: FadeBank<_, 8> = FadeBank::new();
//! bank.bind(zone, pwm)?;
//! bank.start_fade(zone, 700, 500)?;
//!
//! // Every 10 ms:
//! bank.update(10);
//! ```

use heapless::Vec;

use domotica_core::config::{ZoneId, ADC_MAX};
use domotica_core::traits::ActuationError;
use domotica_hal::pwm::{scale_duty, PwmOutput};

use crate::BankError;

/// One dimmable output
pub struct FadeChannel<P> {
    output: P,
    /// Level currently applied
    level: u16,
    /// Level when the fade started
    start: u16,
    target: u16,
    duration_ms: u32,
    elapsed_ms: u32,
}

impl<P: PwmOutput> FadeChannel<P> {
    /// Wrap an output and switch it off
    pub fn new(output: P) -> Self {
        let mut channel = Self {
            output,
            level: 0,
            start: 0,
            target: 0,
            duration_ms: 0,
            elapsed_ms: 0,
        };
        channel.apply();
        channel
    }

    /// Begin a fade to `target` (0..=1023) lasting `fade_ms`.
    ///
    /// A fade already in progress continues from its current level.
    pub fn start_fade(&mut self, target: u16, fade_ms: u16) {
        self.start = self.level;
        self.target = target.min(ADC_MAX);
        self.duration_ms = fade_ms as u32;
        self.elapsed_ms = 0;
        if self.duration_ms == 0 {
            self.level = self.target;
            self.apply();
        }
    }

    /// Advance the fade by `delta_ms`; returns true while still fading
    pub fn update(&mut self, delta_ms: u32) -> bool {
        if !self.is_fading() {
            return false;
        }

        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms).min(self.duration_ms);
        self.level = self.interpolate();
        self.apply();
        self.is_fading()
    }

    pub fn is_fading(&self) -> bool {
        self.level != self.target
    }

    /// Level currently applied
    pub fn level(&self) -> u16 {
        self.level
    }

    pub fn target(&self) -> u16 {
        self.target
    }

    fn interpolate(&self) -> u16 {
        if self.duration_ms == 0 || self.elapsed_ms >= self.duration_ms {
            return self.target;
        }
        let start = self.start as i32;
        let delta = self.target as i32 - start;
        let step = delta * self.elapsed_ms as i32 / self.duration_ms as i32;
        (start + step) as u16
    }

    fn apply(&mut self) {
        let duty = scale_duty(self.level, ADC_MAX, self.output.max_duty());
        self.output.set_duty(duty);
    }
}

/// PWM zones of an installation, each bound to its own channel
pub struct FadeBank<P, const N: usize> {
    channels: Vec<(ZoneId, FadeChannel<P>), N>,
}

impl<P: PwmOutput, const N: usize> Default for FadeBank<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PwmOutput, const N: usize> FadeBank<P, N> {
    pub const fn new() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// Attach an output to a zone; the output starts off
    pub fn bind(&mut self, zone: ZoneId, output: P) -> Result<(), BankError> {
        if self.channels.iter().any(|(z, _)| *z == zone) {
            return Err(BankError::Duplicate(zone));
        }
        self.channels
            .push((zone, FadeChannel::new(output)))
            .map_err(|_| BankError::Full)
    }

    fn channel_mut(&mut self, zone: ZoneId) -> Option<&mut FadeChannel<P>> {
        self.channels
            .iter_mut()
            .find(|(z, _)| *z == zone)
            .map(|(_, channel)| channel)
    }

    /// Start a fade on a zone's channel
    pub fn start_fade(&mut self, zone: ZoneId, duty: u16, fade_ms: u16) -> Result<(), ActuationError> {
        let channel = self.channel_mut(zone).ok_or(ActuationError::NotSupported)?;
        channel.start_fade(duty, fade_ms);
        Ok(())
    }

    /// Advance every fade; returns true while any channel is still fading
    pub fn update(&mut self, delta_ms: u32) -> bool {
        let mut fading = false;
        for (_, channel) in self.channels.iter_mut() {
            fading |= channel.update(delta_ms);
        }
        fading
    }

    pub fn is_fading(&self) -> bool {
        self.channels.iter().any(|(_, channel)| channel.is_fading())
    }

    /// Applied level of a zone
    pub fn level(&self, zone: ZoneId) -> Option<u16> {
        self.channels
            .iter()
            .find(|(z, _)| *z == zone)
            .map(|(_, channel)| channel.level())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock PWM channel for testing
    struct MockPwm {
        max: u16,
        duty: u16,
    }

    impl MockPwm {
        fn new(max: u16) -> Self {
            Self { max, duty: 1234 }
        }
    }

    impl PwmOutput for MockPwm {
        fn max_duty(&self) -> u16 {
            self.max
        }

        fn set_duty(&mut self, duty: u16) {
            self.duty = duty.min(self.max);
        }

        fn duty(&self) -> u16 {
            self.duty
        }
    }

    fn zone(id: u8) -> ZoneId {
        ZoneId::new(id).unwrap()
    }

    #[test]
    fn test_new_channel_is_off() {
        let channel = FadeChannel::new(MockPwm::new(1023));
        assert_eq!(channel.level(), 0);
        assert_eq!(channel.output.duty(), 0);
        assert!(!channel.is_fading());
    }

    #[test]
    fn test_linear_fade_up() {
        let mut channel = FadeChannel::new(MockPwm::new(1023));
        channel.start_fade(1000, 500);
        assert!(channel.is_fading());

        assert!(channel.update(100));
        assert_eq!(channel.level(), 200);
        assert!(channel.update(150));
        assert_eq!(channel.level(), 500);
        assert!(!channel.update(250));
        assert_eq!(channel.level(), 1000);
        assert_eq!(channel.output.duty(), 1000);
        assert!(!channel.update(10));
    }

    #[test]
    fn test_fade_down() {
        let mut channel = FadeChannel::new(MockPwm::new(1023));
        channel.start_fade(800, 0);
        channel.start_fade(0, 400);

        channel.update(100);
        assert_eq!(channel.level(), 600);
        channel.update(1000);
        assert_eq!(channel.level(), 0);
        assert!(!channel.is_fading());
    }

    #[test]
    fn test_zero_duration_applies_immediately() {
        let mut channel = FadeChannel::new(MockPwm::new(1023));
        channel.start_fade(223, 0);
        assert_eq!(channel.level(), 223);
        assert_eq!(channel.output.duty(), 223);
        assert!(!channel.is_fading());
    }

    #[test]
    fn test_retarget_mid_fade() {
        let mut channel = FadeChannel::new(MockPwm::new(1023));
        channel.start_fade(1000, 500);
        channel.update(250);
        assert_eq!(channel.level(), 500);

        channel.start_fade(0, 500);
        channel.update(250);
        assert_eq!(channel.level(), 250);
    }

    #[test]
    fn test_output_resolution_scaling() {
        let mut channel = FadeChannel::new(MockPwm::new(10_000));
        channel.start_fade(1023, 0);
        assert_eq!(channel.output.duty(), 10_000);
        channel.start_fade(512, 0);
        assert_eq!(channel.output.duty(), 5005);
    }

    #[test]
    fn test_bank_routing() {
        let mut bank: FadeBank<MockPwm, 2> = FadeBank::new();
        bank.bind(zone(1), MockPwm::new(1023)).unwrap();
        bank.bind(zone(2), MockPwm::new(1023)).unwrap();
        assert_eq!(bank.bind(zone(3), MockPwm::new(1023)), Err(BankError::Full));

        bank.start_fade(zone(2), 400, 200).unwrap();
        assert!(bank.is_fading());
        assert!(bank.update(100));
        assert_eq!(bank.level(zone(2)), Some(200));
        assert_eq!(bank.level(zone(1)), Some(0));
        assert!(!bank.update(100));
        assert_eq!(bank.level(zone(2)), Some(400));
    }

    #[test]
    fn test_bank_unknown_zone() {
        let mut bank: FadeBank<MockPwm, 2> = FadeBank::new();
        bank.bind(zone(1), MockPwm::new(1023)).unwrap();
        assert_eq!(
            bank.start_fade(zone(7), 100, 0),
            Err(ActuationError::NotSupported)
        );
        assert_eq!(bank.level(zone(7)), None);
    }

    #[test]
    fn test_bank_duplicate_zone() {
        let mut bank: FadeBank<MockPwm, 2> = FadeBank::new();
        bank.bind(zone(1), MockPwm::new(1023)).unwrap();
        assert_eq!(
            bank.bind(zone(1), MockPwm::new(1023)),
            Err(BankError::Duplicate(zone(1)))
        );
    }
}

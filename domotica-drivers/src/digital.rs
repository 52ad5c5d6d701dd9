//! Digital zone outputs
//!
//! On/off zones driven by a GPIO pin, directly or through a relay board.
//! Many relay boards switch on a low input, so each output can be inverted.

use heapless::Vec;

use domotica_core::config::ZoneId;
use domotica_core::traits::ActuationError;
use domotica_hal::gpio::OutputPin;

use crate::BankError;

/// One switched output
pub struct DigitalOutput<P> {
    pin: P,
    /// If true, zone ON = pin LOW
    inverted: bool,
    on: bool,
}

impl<P: OutputPin> DigitalOutput<P> {
    /// Wrap a pin and switch the zone off
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut output = Self {
            pin,
            inverted,
            on: false,
        };
        output.set_on(false);
        output
    }

    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    pub fn set_on(&mut self, on: bool) {
        self.on = on;
        self.pin.set_state(on != self.inverted);
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}

/// Digital zones of an installation
pub struct DigitalBank<P, const N: usize> {
    outputs: Vec<(ZoneId, DigitalOutput<P>), N>,
}

impl<P: OutputPin, const N: usize> Default for DigitalBank<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: OutputPin, const N: usize> DigitalBank<P, N> {
    pub const fn new() -> Self {
        Self {
            outputs: Vec::new(),
        }
    }

    /// Attach an output to a zone; the zone starts off
    pub fn bind(&mut self, zone: ZoneId, output: DigitalOutput<P>) -> Result<(), BankError> {
        if self.outputs.iter().any(|(z, _)| *z == zone) {
            return Err(BankError::Duplicate(zone));
        }
        self.outputs
            .push((zone, output))
            .map_err(|_| BankError::Full)
    }

    /// Switch a zone
    pub fn write(&mut self, zone: ZoneId, on: bool) -> Result<(), ActuationError> {
        let (_, output) = self
            .outputs
            .iter_mut()
            .find(|(z, _)| *z == zone)
            .ok_or(ActuationError::NotSupported)?;
        output.set_on(on);
        Ok(())
    }

    pub fn is_on(&self, zone: ZoneId) -> Option<bool> {
        self.outputs
            .iter()
            .find(|(z, _)| *z == zone)
            .map(|(_, output)| output.is_on())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock GPIO pin for testing
    struct MockPin {
        high: bool,
    }

    impl MockPin {
        fn new() -> Self {
            Self { high: true }
        }
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    fn zone(id: u8) -> ZoneId {
        ZoneId::new(id).unwrap()
    }

    #[test]
    fn test_active_high_output() {
        let mut output = DigitalOutput::new_active_high(MockPin::new());
        assert!(!output.is_on());
        assert!(output.pin.is_set_low());

        output.set_on(true);
        assert!(output.is_on());
        assert!(output.pin.is_set_high());
    }

    #[test]
    fn test_active_low_output() {
        let mut output = DigitalOutput::new_active_low(MockPin::new());
        assert!(!output.is_on());
        assert!(output.pin.is_set_high());

        output.set_on(true);
        assert!(output.pin.is_set_low());
    }

    #[test]
    fn test_bank_write() {
        let mut bank: DigitalBank<MockPin, 4> = DigitalBank::new();
        bank.bind(zone(7), DigitalOutput::new_active_high(MockPin::new()))
            .unwrap();
        bank.bind(zone(13), DigitalOutput::new_active_low(MockPin::new()))
            .unwrap();

        bank.write(zone(13), true).unwrap();
        assert_eq!(bank.is_on(zone(13)), Some(true));
        assert_eq!(bank.is_on(zone(7)), Some(false));
    }

    #[test]
    fn test_bank_unknown_zone() {
        let mut bank: DigitalBank<MockPin, 4> = DigitalBank::new();
        assert_eq!(bank.write(zone(2), true), Err(ActuationError::NotSupported));
        assert_eq!(bank.is_on(zone(2)), None);
    }

    #[test]
    fn test_bank_capacity() {
        let mut bank: DigitalBank<MockPin, 1> = DigitalBank::new();
        bank.bind(zone(7), DigitalOutput::new_active_high(MockPin::new()))
            .unwrap();
        assert_eq!(
            bank.bind(zone(8), DigitalOutput::new_active_high(MockPin::new())),
            Err(BankError::Full)
        );
        assert_eq!(
            bank.bind(zone(7), DigitalOutput::new_active_high(MockPin::new())),
            Err(BankError::Duplicate(zone(7)))
        );
    }
}

//! Bridges from `embedded-hal` 1.0 peripherals to the Domotica HAL traits
//!
//! Chip HALs expose their pins and PWM channels through `embedded-hal`.

use embedded_hal::digital;
use embedded_hal::pwm::SetDutyCycle;

use domotica_hal::gpio::OutputPin;
use domotica_hal::pwm::PwmOutput;

/// Output pin backed by an `embedded-hal` output
pub struct EhOutputPin<P> {
    inner: P,
    high: bool,
}

impl<P: digital::OutputPin> EhOutputPin<P> {
    /// Wrap a pin and drive it low
    pub fn new(mut inner: P) -> Self {
        let _ = inner.set_low();
        Self { inner, high: false }
    }
}

impl<P: digital::OutputPin> OutputPin for EhOutputPin<P> {
    fn set_high(&mut self) {
        // GPIO writes on the supported chips are infallible
        if self.inner.set_high().is_ok() {
            self.high = true;
        }
    }

    fn set_low(&mut self) {
        if self.inner.set_low().is_ok() {
            self.high = false;
        }
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// PWM channel backed by an `embedded-hal` duty-cycle setter
pub struct EhPwm<P> {
    inner: P,
    duty: u16,
}

impl<P: SetDutyCycle> EhPwm<P> {
    /// Wrap a channel and switch it fully off
    pub fn new(mut inner: P) -> Self {
        let _ = inner.set_duty_cycle_fully_off();
        Self { inner, duty: 0 }
    }
}

impl<P: SetDutyCycle> PwmOutput for EhPwm<P> {
    fn max_duty(&self) -> u16 {
        self.inner.max_duty_cycle()
    }

    fn set_duty(&mut self, duty: u16) {
        let duty = duty.min(self.inner.max_duty_cycle());
        if self.inner.set_duty_cycle(duty).is_ok() {
            self.duty = duty;
        }
    }

    fn duty(&self) -> u16 {
        self.duty
    }
}

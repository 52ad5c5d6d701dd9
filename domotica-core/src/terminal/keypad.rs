//! Resistor-ladder keypad decoding
//!
//! All three buttons share one analog input. With no button down the line
//! sits near full scale; each button pulls it to its own level.

use domotica_protocol::ButtonId;

use crate::config::KeypadConfig;

/// Maps analog samples to buttons
#[derive(Debug, Clone)]
pub struct AnalogKeypad {
    config: KeypadConfig,
}

impl AnalogKeypad {
    pub fn new(config: KeypadConfig) -> Self {
        Self { config }
    }

    /// Button whose window contains `sample`, if any.
    ///
    /// Windows are tried in button order; the first match wins.
    pub fn read_button(&self, sample: u16) -> Option<ButtonId> {
        if sample >= self.config.valid_edge {
            return None;
        }
        let interval = self.config.interval;
        self.config
            .means
            .iter()
            .position(|&mean| {
                sample >= mean.saturating_sub(interval) && sample <= mean.saturating_add(interval)
            })
            .and_then(|index| ButtonId::from_number(index as u8 + 1))
    }
}

/// Running average of raw keypad samples.
///
/// Used while calibrating a ladder: hold a button and read the mean to get
/// its window centre.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdcMeanTracker {
    sum: u32,
    count: u32,
}

impl AdcMeanTracker {
    pub const fn new() -> Self {
        Self { sum: 0, count: 0 }
    }

    pub fn push(&mut self, sample: u16) {
        self.sum = self.sum.saturating_add(sample as u32);
        self.count = self.count.saturating_add(1);
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Rounded mean of the samples so far
    pub fn mean(&self) -> Option<u16> {
        if self.count == 0 {
            return None;
        }
        Some(((self.sum + self.count / 2) / self.count) as u16)
    }

    /// Return the mean and start a new window
    pub fn take_mean(&mut self) -> Option<u16> {
        let mean = self.mean();
        *self = Self::new();
        mean
    }
}

//! Dimmer trimmer tracking

/// Follows the trimmer position and flags movement beyond ADC noise
#[derive(Debug, Clone)]
pub struct TrimmerTracker {
    value: Option<u16>,
    changed: bool,
    threshold: u16,
}

impl TrimmerTracker {
    /// `threshold` is the smallest movement (in ADC steps) that counts
    pub fn new(threshold: u16) -> Self {
        Self {
            value: None,
            changed: false,
            threshold,
        }
    }

    /// Feed one sample; returns true when it counts as a movement.
    ///
    /// The first sample only establishes the resting position.
    pub fn update(&mut self, sample: u16) -> bool {
        match self.value {
            None => {
                self.value = Some(sample);
                false
            }
            Some(last) if sample.abs_diff(last) > self.threshold => {
                self.value = Some(sample);
                self.changed = true;
                true
            }
            Some(_) => false,
        }
    }

    /// Last accepted position
    pub fn value(&self) -> u16 {
        self.value.unwrap_or(0)
    }

    /// Moved since the last report
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn clear_changed(&mut self) {
        self.changed = false;
    }
}

//! Bus health counters

use super::engine::{PollError, PollOutcome};

/// Running totals kept by the polling engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollStats {
    /// Transactions started
    pub polls: u32,
    /// Terminals that answered with a valid report
    pub reports: u32,
    /// Terminals that had nothing to say
    pub idle: u32,
    /// Wrong echo byte, or a payload of the wrong length or shape
    pub invalid_responses: u32,
    /// Echo received but no payload followed
    pub timeouts: u32,
    /// Payload checksum mismatches
    pub crc_errors: u32,
    /// Transport failures
    pub bus_errors: u32,
}

impl PollStats {
    pub fn record_outcome(&mut self, outcome: &PollOutcome) {
        match outcome {
            PollOutcome::Disabled => {}
            PollOutcome::Idle { .. } => self.idle = self.idle.wrapping_add(1),
            PollOutcome::Report { .. } => self.reports = self.reports.wrapping_add(1),
        }
    }

    pub fn record_error(&mut self, error: &PollError) {
        let counter = match error {
            PollError::InvalidResponse { .. }
            | PollError::ShortResponse { .. }
            | PollError::LongResponse { .. }
            | PollError::Malformed { .. } => &mut self.invalid_responses,
            PollError::Timeout { .. } => &mut self.timeouts,
            PollError::InvalidCrc { .. } => &mut self.crc_errors,
            PollError::Bus { .. } => &mut self.bus_errors,
        };
        *counter = counter.wrapping_add(1);
    }

    /// All failed transactions
    pub fn errors(&self) -> u32 {
        self.invalid_responses
            .wrapping_add(self.timeouts)
            .wrapping_add(self.crc_errors)
            .wrapping_add(self.bus_errors)
    }
}

//! Round-robin polling engine
//!
//! One call to [`PollingEngine::poll`] is one bus transaction:
//!
//! ```text
//! master:   [1|id]
//! terminal:        [0|id] [0|p0] [0|p1] [0|p2] [0|p3]
//!           ├ poll_timeout ┤├──── conn_timeout ────┤
//! ```
//!
//! A terminal with nothing to report stays silent and the transaction ends
//! after `poll_timeout_ms`. A reply is complete once the line stays quiet
//! for [`REPLY_END_QUIET_MS`] after the payload. Every failed transaction
//! flushes the receive path so stray bytes cannot desynchronise the next
//! one.

use domotica_protocol::wire::{decode_slave_byte, is_slave_byte};
use domotica_protocol::{poll_byte, DeviceId, ReportError, TerminalReport, MAX_DEVICES, REPORT_WIRE_LEN};

use super::stats::PollStats;
use crate::config::BusConfig;
use crate::traits::BusPort;

/// Line silence that ends a terminal reply (ms)
pub const REPLY_END_QUIET_MS: u32 = 3;

/// Result of a completed transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    /// No terminals configured, nothing was sent
    Disabled,
    /// Terminal did not answer the poll
    Idle { device: DeviceId },
    /// Terminal answered with a valid report
    Report {
        device: DeviceId,
        report: TerminalReport,
    },
}

/// Failed transaction. The receive path has already been flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollError {
    /// Answer did not echo the polled device id
    InvalidResponse { device: DeviceId, byte: u8 },
    /// Echo received, payload never arrived
    Timeout { device: DeviceId },
    /// Payload ended early
    ShortResponse { device: DeviceId, received: usize },
    /// More bytes followed the payload
    LongResponse { device: DeviceId },
    /// Payload bytes carried the master marker
    Malformed { device: DeviceId },
    /// Payload checksum mismatch
    InvalidCrc {
        device: DeviceId,
        expected: u8,
        received: u8,
    },
    /// Bus port reported a transport error
    Bus { device: DeviceId },
}

impl PollError {
    /// Device the failed transaction addressed
    pub fn device(&self) -> DeviceId {
        match *self {
            PollError::InvalidResponse { device, .. }
            | PollError::Timeout { device }
            | PollError::ShortResponse { device, .. }
            | PollError::LongResponse { device }
            | PollError::Malformed { device }
            | PollError::InvalidCrc { device, .. }
            | PollError::Bus { device } => device,
        }
    }
}

/// Bus master state: whom to poll next and how the bus is doing
#[derive(Debug, Clone)]
pub struct PollingEngine {
    config: BusConfig,
    terminal_count: u8,
    next_device: u8,
    stats: PollStats,
}

impl PollingEngine {
    /// Create an engine whose first poll addresses device 0
    pub fn new(config: BusConfig) -> Self {
        let terminal_count = config.terminal_count.min(MAX_DEVICES as u8);
        Self {
            config,
            terminal_count,
            next_device: terminal_count.saturating_sub(1),
            stats: PollStats::default(),
        }
    }

    /// Polling is off when no terminals are configured
    pub fn is_enabled(&self) -> bool {
        self.terminal_count > 0
    }

    pub fn terminal_count(&self) -> u8 {
        self.terminal_count
    }

    pub fn stats(&self) -> &PollStats {
        &self.stats
    }

    /// Run one transaction with the next device in turn
    pub async fn poll<B: BusPort>(&mut self, bus: &mut B) -> Result<PollOutcome, PollError> {
        if !self.is_enabled() {
            return Ok(PollOutcome::Disabled);
        }

        let device = self.advance();
        self.stats.polls = self.stats.polls.wrapping_add(1);

        let result = self.transact(bus, device).await;
        match &result {
            Ok(outcome) => self.stats.record_outcome(outcome),
            Err(error) => {
                self.stats.record_error(error);
                bus.flush_rx().await;
            }
        }
        result
    }

    fn advance(&mut self) -> DeviceId {
        self.next_device = (self.next_device + 1) % self.terminal_count;
        DeviceId::masked(self.next_device)
    }

    async fn transact<B: BusPort>(
        &self,
        bus: &mut B,
        device: DeviceId,
    ) -> Result<PollOutcome, PollError> {
        bus.write_all(&[poll_byte(device)])
            .await
            .map_err(|_| PollError::Bus { device })?;

        let mut echo = [0u8; 1];
        let n = bus
            .read_with_timeout(&mut echo, self.config.poll_timeout_ms)
            .await
            .map_err(|_| PollError::Bus { device })?;
        if n == 0 {
            return Ok(PollOutcome::Idle { device });
        }

        let byte = echo[0];
        if !is_slave_byte(byte) || decode_slave_byte(byte) != device.get() {
            return Err(PollError::InvalidResponse { device, byte });
        }

        let mut payload = [0u8; REPORT_WIRE_LEN];
        let received = bus
            .read_with_timeout(&mut payload, self.config.conn_timeout_ms)
            .await
            .map_err(|_| PollError::Bus { device })?;
        match received {
            0 => return Err(PollError::Timeout { device }),
            n if n < REPORT_WIRE_LEN => {
                return Err(PollError::ShortResponse {
                    device,
                    received: n,
                })
            }
            _ => {}
        }

        let mut surplus = [0u8; 1];
        let extra = bus
            .read_with_timeout(&mut surplus, REPLY_END_QUIET_MS)
            .await
            .map_err(|_| PollError::Bus { device })?;
        if extra > 0 {
            return Err(PollError::LongResponse { device });
        }

        let report = TerminalReport::from_wire(&payload).map_err(|err| match err {
            ReportError::InvalidCrc { expected, received } => PollError::InvalidCrc {
                device,
                expected,
                received,
            },
            _ => PollError::Malformed { device },
        })?;

        Ok(PollOutcome::Report { device, report })
    }
}

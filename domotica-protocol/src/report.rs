//! Terminal report payload.
//!
//! Payload layout before stuffing (3 bytes):
//! - bytes 0..2: little-endian u16, bits 0..10 trimmer, bits 10..16 button states
//! - byte 2: CRC-8 of bytes 0..2
//!
//! A complete reply is the terminal's id echo followed by the 4 stuffed
//! payload bytes.

use crate::address::DeviceId;
use crate::buttons::ButtonStates;
use crate::checksum::crc8;
use crate::wire::{self, Role, WireError};

/// Unstuffed payload size
pub const REPORT_PAYLOAD_LEN: usize = 3;

/// Stuffed payload size on the wire, `encoded_size(3)`
pub const REPORT_WIRE_LEN: usize = 4;

/// Id echo plus stuffed payload
pub const REPLY_LEN: usize = 1 + REPORT_WIRE_LEN;

/// Full-scale trimmer reading (10-bit ADC)
pub const TRIMMER_MAX: u16 = 1023;

const TRIMMER_MASK: u16 = 0x03FF;
const BUTTONS_SHIFT: u16 = 10;

/// Errors decoding a terminal report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportError {
    /// Wrong number of payload bytes
    InvalidLength,
    /// A payload byte carried the master marker
    NotSlaveByte,
    /// Checksum mismatch
    InvalidCrc { expected: u8, received: u8 },
    /// Stuffing codec failure
    Wire(WireError),
}

impl From<WireError> for ReportError {
    fn from(err: WireError) -> Self {
        ReportError::Wire(err)
    }
}

/// Input a terminal reports when polled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TerminalReport {
    /// Trimmer position, 0..=1023
    pub trimmer: u16,
    /// Classified button states
    pub buttons: ButtonStates,
}

impl TerminalReport {
    /// Create a report, clamping the trimmer to full scale
    pub fn new(trimmer: u16, buttons: ButtonStates) -> Self {
        Self {
            trimmer: trimmer.min(TRIMMER_MAX),
            buttons,
        }
    }

    /// Pack into the 3-byte checksummed payload
    pub fn to_payload(&self) -> [u8; REPORT_PAYLOAD_LEN] {
        let word = (self.trimmer & TRIMMER_MASK) | ((self.buttons.raw() as u16) << BUTTONS_SHIFT);
        let [lo, hi] = word.to_le_bytes();
        [lo, hi, crc8(&[lo, hi])]
    }

    /// Unpack a 3-byte payload, verifying its checksum
    pub fn from_payload(payload: &[u8]) -> Result<Self, ReportError> {
        let [lo, hi, received] = <[u8; REPORT_PAYLOAD_LEN]>::try_from(payload)
            .map_err(|_| ReportError::InvalidLength)?;

        let expected = crc8(&[lo, hi]);
        if expected != received {
            return Err(ReportError::InvalidCrc { expected, received });
        }

        let word = u16::from_le_bytes([lo, hi]);
        Ok(Self {
            trimmer: word & TRIMMER_MASK,
            buttons: ButtonStates::from_raw((word >> BUTTONS_SHIFT) as u8),
        })
    }

    /// Stuff the payload as a terminal would send it
    pub fn to_wire(&self) -> Result<[u8; REPORT_WIRE_LEN], ReportError> {
        let mut out = [0u8; REPORT_WIRE_LEN];
        wire::encode(Role::Slave, &self.to_payload(), &mut out)?;
        Ok(out)
    }

    /// Decode the 4 stuffed bytes that follow a terminal's id echo
    pub fn from_wire(encoded: &[u8]) -> Result<Self, ReportError> {
        if encoded.len() != REPORT_WIRE_LEN {
            return Err(ReportError::InvalidLength);
        }
        if !encoded.iter().all(|&b| wire::is_slave_byte(b)) {
            return Err(ReportError::NotSlaveByte);
        }

        let mut payload = [0u8; REPORT_PAYLOAD_LEN];
        wire::decode(encoded, &mut payload)?;
        Self::from_payload(&payload)
    }

    /// Complete reply: id echo followed by the stuffed payload
    pub fn to_reply(&self, device: DeviceId) -> Result<[u8; REPLY_LEN], ReportError> {
        let body = self.to_wire()?;
        let mut reply = [0u8; REPLY_LEN];
        reply[0] = echo_byte(device);
        reply[1..].copy_from_slice(&body);
        Ok(reply)
    }
}

/// Byte the master sends to address a terminal
pub const fn poll_byte(device: DeviceId) -> u8 {
    wire::encode_master_byte(device.get())
}

/// Byte a terminal sends to acknowledge a poll
pub const fn echo_byte(device: DeviceId) -> u8 {
    wire::encode_slave_byte(device.get())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buttons::{ButtonId, ButtonState};
    use proptest::prelude::*;

    fn device(id: u8) -> DeviceId {
        DeviceId::new(id).unwrap()
    }

    #[test]
    fn test_payload_layout() {
        let mut buttons = ButtonStates::new();
        buttons.set(ButtonId::One, ButtonState::Pressed);
        buttons.set(ButtonId::Two, ButtonState::Held);
        let report = TerminalReport::new(0x012, buttons);

        assert_eq!(report.to_payload(), [0x12, 0x34, 0xF1]);
    }

    #[test]
    fn test_from_payload() {
        let report = TerminalReport::from_payload(&[0x12, 0x34, 0xF1]).unwrap();
        assert_eq!(report.trimmer, 0x012);
        assert_eq!(report.buttons.get(ButtonId::One), ButtonState::Pressed);
        assert_eq!(report.buttons.get(ButtonId::Two), ButtonState::Held);
        assert_eq!(report.buttons.get(ButtonId::Three), ButtonState::Idle);
    }

    #[test]
    fn test_from_payload_bad_crc() {
        let result = TerminalReport::from_payload(&[0x12, 0x34, 0x00]);
        assert_eq!(
            result,
            Err(ReportError::InvalidCrc {
                expected: 0xF1,
                received: 0x00
            })
        );
    }

    #[test]
    fn test_from_payload_wrong_length() {
        assert_eq!(
            TerminalReport::from_payload(&[0x12, 0x34]),
            Err(ReportError::InvalidLength)
        );
    }

    #[test]
    fn test_reply_bytes() {
        let report = TerminalReport::from_payload(&[0x12, 0x34, 0xF1]).unwrap();
        let reply = report.to_reply(device(1)).unwrap();
        assert_eq!(reply, [0x01, 0x12, 0x68, 0x44, 0x07]);
    }

    #[test]
    fn test_from_wire() {
        let report = TerminalReport::from_wire(&[0x12, 0x68, 0x44, 0x07]).unwrap();
        assert_eq!(report.trimmer, 0x012);
    }

    #[test]
    fn test_from_wire_single_bit_error() {
        let result = TerminalReport::from_wire(&[0x13, 0x68, 0x44, 0x07]);
        assert_eq!(
            result,
            Err(ReportError::InvalidCrc {
                expected: crc8(&[0x13, 0x34]),
                received: 0xF1
            })
        );
    }

    #[test]
    fn test_from_wire_rejects_master_bytes() {
        let result = TerminalReport::from_wire(&[0x92, 0x68, 0x44, 0x07]);
        assert_eq!(result, Err(ReportError::NotSlaveByte));
    }

    #[test]
    fn test_from_wire_wrong_length() {
        assert_eq!(
            TerminalReport::from_wire(&[0x12, 0x68, 0x44]),
            Err(ReportError::InvalidLength)
        );
    }

    #[test]
    fn test_trimmer_clamped() {
        let report = TerminalReport::new(5000, ButtonStates::new());
        assert_eq!(report.trimmer, TRIMMER_MAX);
    }

    #[test]
    fn test_poll_and_echo_bytes() {
        assert_eq!(poll_byte(device(0)), 0x80);
        assert_eq!(poll_byte(device(12)), 0x8C);
        assert_eq!(echo_byte(device(12)), 0x0C);
    }

    proptest! {
        #[test]
        fn prop_wire_roundtrip(trimmer in 0u16..=TRIMMER_MAX, raw in 0u8..64) {
            let report = TerminalReport::new(trimmer, ButtonStates::from_raw(raw));
            let wire = report.to_wire().unwrap();
            prop_assert!(wire.iter().all(|&b| b & 0x80 == 0));
            prop_assert_eq!(TerminalReport::from_wire(&wire).unwrap(), report);
        }
    }
}

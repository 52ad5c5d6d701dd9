//! Domotica RS-485 Bus Protocol
//!
//! This crate defines the half-duplex protocol spoken between the central
//! unit (bus master) and the wall terminals (slaves). Exactly one master
//! exists; a terminal only ever talks right after being addressed.
//!
//! # Protocol Overview
//!
//! Every byte on the wire carries its author in bit 7, so a byte can be
//! attributed to master or terminal without any framing context:
//! ```text
//! master poll:     ┌────────────┐
//!                  │ 1 │ id (7) │
//!                  └────────────┘
//! terminal reply:  ┌────────────┬──────────────────────────────┐
//!                  │ 0 │ id (7) │ 4 × (0 │ 7 payload bits)      │
//!                  └────────────┴──────────────────────────────┘
//! ```
//!
//! The 3-byte report payload (trimmer position, button states, CRC-8) is
//! stuffed into 7-bit groups by [`wire`] before transmission.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod address;
pub mod buttons;
pub mod checksum;
pub mod report;
pub mod wire;

pub use address::{DeviceId, MAX_DEVICES};
pub use buttons::{ButtonId, ButtonState, ButtonStates, MAX_BUTTONS};
pub use checksum::crc8;
pub use report::{
    echo_byte, poll_byte, ReportError, TerminalReport, REPLY_LEN, REPORT_PAYLOAD_LEN,
    REPORT_WIRE_LEN, TRIMMER_MAX,
};
pub use wire::{Role, WireError};

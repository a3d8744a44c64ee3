//! Firmata-subset pin protocol
//!
//! This crate encodes and decodes the small subset of Firmata 2 a host needs
//! to drive the digital and analog pins of a remote board over a serial
//! line: pin modes, digital port writes and reports, analog writes and
//! reports, and the firmware version query.
//!
//! # Wire format
//!
//! Bit 7 separates command headers from data bytes. Headers below `0xF0`
//! carry a channel in their low nibble; payload values are split into 7-bit
//! data bytes, least significant first:
//! ```text
//! ┌─────────────────┬───────────┬───────────┐
//! │ 1001 pppp       │ 0vvv vvvv │ 0000 000v │   DIGITAL_MESSAGE, port p
//! │ 1110 cccc       │ 0vvv vvvv │ 0vvv vvvv │   ANALOG_MESSAGE, channel c
//! │ 1111 1001       │ 0 minor   │ 0 major   │   REPORT_VERSION
//! └─────────────────┴───────────┴───────────┘
//! ```
//!
//! Sysex blocks (`0xF0 ... 0xF7`) are skipped without interpretation.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod events;
pub mod layout;
pub mod message;
pub mod store;

pub use command::{Command, Header};
pub use decoder::{Decoder, Events, MAX_DATA_BYTES};
pub use encoder::Encoder;
pub use error::{LayoutError, LinkError, PinError};
pub use events::{DecodeEvent, FirmwareVersion};
pub use layout::{BoardLayout, MAX_ANALOG_CHANNELS, MAX_PORTS};
pub use message::Message;
pub use store::PinState;

//! Pinwire Hardware Abstraction Layer
//!
//! This crate defines the traits that sit between the protocol code and
//! everything outside it: the serial transport that carries the bytes, and
//! the pin capabilities a remote board exposes to application code.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (read loop, UI, ...)       │
//! └─────────────────────────────────────────┘
//!          │ capability traits      ▲
//!          ▼                        │
//! ┌─────────────────────────────────────────┐
//! │  pinwire-core (Board)                   │
//! │  pinwire-protocol (Encoder, Decoder)    │
//! └─────────────────────────────────────────┘
//!          │ transport traits       ▲
//!          ▼                        │
//! ┌─────────────────────────────────────────┐
//! │  Serial port (pinwire-drivers, ...)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial transport
//! - [`uart::ByteListener`] - Receiver of bytes delivered by the transport
//! - [`gpio::PinModeControl`], [`gpio::DigitalPins`], [`gpio::AnalogPins`] -
//!   Remote pin capabilities

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod gpio;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::{AnalogPins, DigitalPins, PinMode, PinModeControl, RemoteBoard};
pub use uart::{ByteListener, UartConfig, UartRx, UartTx};

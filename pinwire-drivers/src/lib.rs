//! Transport implementations
//!
//! This crate provides concrete implementations of the transport traits
//! defined in pinwire-hal:
//!
//! - Any `embedded-io` byte stream (HAL serial drivers, USB CDC, host
//!   serial ports behind an adapter)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod uart;

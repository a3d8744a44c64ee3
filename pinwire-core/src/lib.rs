//! Board-level driver for remote pinwire boards
//!
//! This crate ties the protocol codec to a transport:
//!
//! - [`Board`]: one concrete type with the full pin capability set
//! - [`SharedEncoder`]: encoder guarded for use from several tasks
//! - [`BoardConfig`]: port/channel counts, serial settings, startup delay
//!
//! A typical host connects, waits [`BoardConfig::startup_delay_ms`], calls
//! [`Board::start_reporting`], and then polls:
//!
//! ```ignore
//! let mut board = Board::from_config(tx, rx, &config)?;
//! sleep_ms(config.startup_delay_ms);
//! board.start_reporting()?;
//! loop {
//!     if let Some(event) = board.poll()? {
//!         handle(event);
//!     }
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod board;
pub mod config;
pub mod shared;

pub use board::Board;
pub use config::{BoardConfig, ConfigError, DEFAULT_STARTUP_DELAY_MS};
pub use shared::SharedEncoder;

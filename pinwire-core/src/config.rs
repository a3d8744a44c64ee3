//! Board configuration
//!
//! Everything a host needs to know about a board before talking to it. The
//! struct is flat so it reads naturally from a config file section:
//!
//! ```toml
//! digital_ports = 3
//! analog_channels = 6
//! reported_digital_ports = 2
//! reported_analog_channels = 6
//! baudrate = 57600
//! startup_delay_ms = 2500
//! ```

use pinwire_hal::UartConfig;
use pinwire_protocol::{BoardLayout, LayoutError, MAX_ANALOG_CHANNELS, MAX_PORTS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Delay Firmata sketches need after the port opens (they reset on connect)
pub const DEFAULT_STARTUP_DELAY_MS: u32 = 2500;

/// Configuration error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Port/channel counts do not fit the protocol
    Layout(LayoutError),
    /// Baud rate of zero
    InvalidBaudrate,
}

impl From<LayoutError> for ConfigError {
    fn from(err: LayoutError) -> Self {
        ConfigError::Layout(err)
    }
}

/// Board configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoardConfig {
    /// Digital ports mirrored (8 pins each, at most 16)
    pub digital_ports: u8,
    /// Analog channels mirrored (at most 16)
    pub analog_channels: u8,
    /// Digital ports the report burst enables
    pub reported_digital_ports: u8,
    /// Analog channels the report burst enables
    pub reported_analog_channels: u8,
    /// Serial baud rate
    pub baudrate: u32,
    /// How long the caller should wait after connecting before
    /// [`Board::start_reporting`](crate::Board::start_reporting)
    pub startup_delay_ms: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            digital_ports: MAX_PORTS as u8,
            analog_channels: MAX_ANALOG_CHANNELS as u8,
            reported_digital_ports: 2,
            reported_analog_channels: 6,
            baudrate: UartConfig::FIRMATA_BAUDRATE,
            startup_delay_ms: DEFAULT_STARTUP_DELAY_MS,
        }
    }
}

impl BoardConfig {
    /// Check every field
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout()?;
        self.uart()?;
        Ok(())
    }

    /// Port/channel layout described by this config
    pub fn layout(&self) -> Result<BoardLayout, ConfigError> {
        BoardLayout::new(
            self.digital_ports,
            self.analog_channels,
            self.reported_digital_ports,
            self.reported_analog_channels,
        )
        .map_err(ConfigError::from)
    }

    /// Serial settings described by this config (always 8N1)
    pub fn uart(&self) -> Result<UartConfig, ConfigError> {
        if self.baudrate == 0 {
            return Err(ConfigError::InvalidBaudrate);
        }
        Ok(UartConfig::with_baudrate(self.baudrate))
    }
}

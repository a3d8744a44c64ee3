//! Board layout
//!
//! How many ports and analog channels the remote board has, and which of
//! them the report burst switches on. Everything that mirrors pin state is
//! sized from this at construction.

use crate::error::LayoutError;

/// Maximum digital ports (the wire channel is a nibble)
pub const MAX_PORTS: usize = 16;

/// Maximum analog channels (the wire channel is a nibble)
pub const MAX_ANALOG_CHANNELS: usize = 16;

/// Pins per digital port
pub const PINS_PER_PORT: u8 = 8;

/// Port/channel counts of a remote board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardLayout {
    digital_ports: u8,
    analog_channels: u8,
    reported_digital_ports: u8,
    reported_analog_channels: u8,
}

impl BoardLayout {
    /// Layout of a standard Arduino running Firmata: mirrors sized for the
    /// full 16 ports/channels, reports enabled on 2 ports and 6 channels
    pub const ARDUINO: Self = Self {
        digital_ports: MAX_PORTS as u8,
        analog_channels: MAX_ANALOG_CHANNELS as u8,
        reported_digital_ports: 2,
        reported_analog_channels: 6,
    };

    /// Create a layout, checking it against the wire limits
    pub fn new(
        digital_ports: u8,
        analog_channels: u8,
        reported_digital_ports: u8,
        reported_analog_channels: u8,
    ) -> Result<Self, LayoutError> {
        if usize::from(digital_ports) > MAX_PORTS {
            return Err(LayoutError::TooManyPorts(digital_ports));
        }
        if usize::from(analog_channels) > MAX_ANALOG_CHANNELS {
            return Err(LayoutError::TooManyChannels(analog_channels));
        }
        if reported_digital_ports > digital_ports {
            return Err(LayoutError::ReportedPortsExceedPorts {
                reported: reported_digital_ports,
                ports: digital_ports,
            });
        }
        if reported_analog_channels > analog_channels {
            return Err(LayoutError::ReportedChannelsExceedChannels {
                reported: reported_analog_channels,
                channels: analog_channels,
            });
        }

        Ok(Self {
            digital_ports,
            analog_channels,
            reported_digital_ports,
            reported_analog_channels,
        })
    }

    /// Number of digital ports
    pub const fn digital_ports(&self) -> u8 {
        self.digital_ports
    }

    /// Number of digital pins (8 per port)
    pub const fn digital_pins(&self) -> u8 {
        // MAX_PORTS * 8 = 128 fits in u8
        self.digital_ports * PINS_PER_PORT
    }

    /// Number of analog input channels
    pub const fn analog_channels(&self) -> u8 {
        self.analog_channels
    }

    /// Ports the report burst enables, starting at port 0
    pub const fn reported_digital_ports(&self) -> u8 {
        self.reported_digital_ports
    }

    /// Analog channels the report burst enables, starting at channel 0
    pub const fn reported_analog_channels(&self) -> u8 {
        self.reported_analog_channels
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::ARDUINO
    }
}

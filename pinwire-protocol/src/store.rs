//! Pin state store
//!
//! Last values the board reported for each digital port and analog channel.
//! Only the decoder writes here; callers read.

use heapless::Vec;

use crate::error::PinError;
use crate::layout::{BoardLayout, MAX_ANALOG_CHANNELS, MAX_PORTS, PINS_PER_PORT};

/// Analog readings travel in 14 bits of wire data
pub const ANALOG_VALUE_MASK: u16 = 0x3FFF;

/// Mirror of the remote board's input state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinState {
    ports: Vec<u8, MAX_PORTS>,
    analog: Vec<u16, MAX_ANALOG_CHANNELS>,
}

impl PinState {
    /// Create a store with every port and channel at zero
    pub fn new(layout: &BoardLayout) -> Self {
        let mut ports = Vec::new();
        let mut analog = Vec::new();
        // BoardLayout guarantees the counts fit the capacities
        let _ = ports.resize(usize::from(layout.digital_ports()), 0);
        let _ = analog.resize(usize::from(layout.analog_channels()), 0);
        Self { ports, analog }
    }

    /// Number of digital ports held
    pub fn port_count(&self) -> u8 {
        self.ports.len() as u8
    }

    /// Number of analog channels held
    pub fn channel_count(&self) -> u8 {
        self.analog.len() as u8
    }

    /// Overwrite the 8-bit value of a digital port
    pub fn set_digital_port(&mut self, port: u8, value: u8) -> Result<(), PinError> {
        let ports = self.port_count();
        let slot = self
            .ports
            .get_mut(usize::from(port))
            .ok_or(PinError::PortOutOfRange { port, ports })?;
        *slot = value;
        Ok(())
    }

    /// Overwrite the value of an analog channel
    ///
    /// The value is kept to 14 bits, the most the wire can carry.
    pub fn set_analog_channel(&mut self, channel: u8, value: u16) -> Result<(), PinError> {
        let channels = self.channel_count();
        let slot = self
            .analog
            .get_mut(usize::from(channel))
            .ok_or(PinError::ChannelOutOfRange { channel, channels })?;
        *slot = value & ANALOG_VALUE_MASK;
        Ok(())
    }

    /// Value of a whole digital port
    pub fn digital_port(&self, port: u8) -> Result<u8, PinError> {
        self.ports
            .get(usize::from(port))
            .copied()
            .ok_or(PinError::PortOutOfRange {
                port,
                ports: self.port_count(),
            })
    }

    /// Level of a single digital pin
    pub fn read_digital_pin(&self, pin: u8) -> Result<bool, PinError> {
        let value = self
            .ports
            .get(usize::from(pin >> 3))
            .ok_or(PinError::PinOutOfRange {
                pin,
                pins: self.port_count() * PINS_PER_PORT,
            })?;
        Ok((value >> (pin & 0x07)) & 0x01 == 1)
    }

    /// Value of an analog channel
    pub fn read_analog_channel(&self, channel: u8) -> Result<u16, PinError> {
        self.analog
            .get(usize::from(channel))
            .copied()
            .ok_or(PinError::ChannelOutOfRange {
                channel,
                channels: self.channel_count(),
            })
    }

    /// Set every port and channel back to zero
    pub fn clear(&mut self) {
        self.ports.iter_mut().for_each(|port| *port = 0);
        self.analog.iter_mut().for_each(|value| *value = 0);
    }
}

//! Outgoing messages and their wire encoding
//!
//! Bit 7 of every byte on the wire marks a command header, so any payload
//! value wider than 7 bits is split into successive data bytes, least
//! significant first.

use heapless::Vec;
use pinwire_hal::PinMode;

use crate::command::{
    ANALOG_MESSAGE, DATA_MASK, DIGITAL_MESSAGE, REPORT_ANALOG, REPORT_DIGITAL, REPORT_VERSION,
    SET_PIN_MODE, SYSTEM_RESET,
};

/// Longest message this codec sends (header plus two data bytes)
pub const MAX_MESSAGE_SIZE: usize = 3;

/// Wire code of a pin mode
pub const fn pin_mode_code(mode: PinMode) -> u8 {
    match mode {
        PinMode::Input => 0x00,
        PinMode::Output => 0x01,
        PinMode::Analog => 0x02,
        PinMode::Pwm => 0x03,
        PinMode::Servo => 0x04,
    }
}

/// Messages from the host to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message {
    /// Set the mode of a pin
    SetPinMode { pin: u8, mode: PinMode },
    /// New output value for all 8 pins of a port
    DigitalPort { port: u8, value: u8 },
    /// PWM (or other analog) output value for a pin
    AnalogWrite { pin: u8, value: u16 },
    /// Enable or disable reporting of an analog channel
    ReportAnalog { channel: u8, enable: bool },
    /// Enable or disable reporting of a digital port
    ReportDigital { port: u8, enable: bool },
    /// Ask the board for its firmware version
    ReportVersion,
    /// Reset the board
    SystemReset,
}

/// Split a value into its low 7 bits and the next 7 bits
const fn split7(value: u16) -> [u8; 2] {
    [(value as u8) & DATA_MASK, ((value >> 7) as u8) & DATA_MASK]
}

impl Message {
    /// Encode this message into wire bytes
    ///
    /// `SetPinMode` sends `pin` raw; callers keep it below 128.
    /// Channel-qualified headers keep only the low nibble of their channel.
    pub fn encode(&self) -> Vec<u8, MAX_MESSAGE_SIZE> {
        let mut buf = [0u8; MAX_MESSAGE_SIZE];
        let len = match *self {
            Message::SetPinMode { pin, mode } => {
                buf = [SET_PIN_MODE, pin, pin_mode_code(mode)];
                3
            }
            Message::DigitalPort { port, value } => {
                let [low, high] = split7(u16::from(value));
                buf = [DIGITAL_MESSAGE | (port & 0x0F), low, high];
                3
            }
            Message::AnalogWrite { pin, value } => {
                let [low, high] = split7(value);
                buf = [ANALOG_MESSAGE | (pin & 0x0F), low, high];
                3
            }
            Message::ReportAnalog { channel, enable } => {
                buf[0] = REPORT_ANALOG | (channel & 0x0F);
                buf[1] = u8::from(enable);
                2
            }
            Message::ReportDigital { port, enable } => {
                buf[0] = REPORT_DIGITAL | (port & 0x0F);
                buf[1] = u8::from(enable);
                2
            }
            Message::ReportVersion => {
                buf[0] = REPORT_VERSION;
                1
            }
            Message::SystemReset => {
                buf[0] = SYSTEM_RESET;
                1
            }
        };

        // len never exceeds MAX_MESSAGE_SIZE
        Vec::from_slice(&buf[..len]).unwrap_or_default()
    }
}

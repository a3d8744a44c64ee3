//! Command bytes and header decoding
//!
//! Every byte on the wire with bit 7 set is a command header; every byte
//! with bit 7 clear is data. Headers below `0xF0` carry a 4-bit channel
//! (port, pin or analog channel) in their low nibble. Headers from `0xF0`
//! upwards are meta-commands and never carry a channel.

/// Send data for a digital port
pub const DIGITAL_MESSAGE: u8 = 0x90;
/// Send data for an analog pin (or PWM)
pub const ANALOG_MESSAGE: u8 = 0xE0;
/// Enable analog input by channel
pub const REPORT_ANALOG: u8 = 0xC0;
/// Enable digital input by port
pub const REPORT_DIGITAL: u8 = 0xD0;
/// Set a pin to INPUT/OUTPUT/PWM/etc
pub const SET_PIN_MODE: u8 = 0xF4;
/// Report firmware version
pub const REPORT_VERSION: u8 = 0xF9;
/// Reset the board
pub const SYSTEM_RESET: u8 = 0xFF;
/// Start a sysex message
pub const START_SYSEX: u8 = 0xF0;
/// End a sysex message
pub const END_SYSEX: u8 = 0xF7;

/// First header value that carries no channel
pub const CHANNEL_LESS_BASE: u8 = 0xF0;

/// Bit that separates command headers from data bytes
pub const COMMAND_BIT: u8 = 0x80;

/// Mask of the 7 payload bits in a data byte
pub const DATA_MASK: u8 = 0x7F;

/// Protocol commands understood by this codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    SetPinMode,
    DigitalMessage,
    AnalogMessage,
    ReportAnalog,
    ReportDigital,
    ReportVersion,
    SystemReset,
    StartSysex,
    EndSysex,
}

impl Command {
    /// Wire code of this command (channel nibble clear)
    pub const fn code(self) -> u8 {
        match self {
            Command::SetPinMode => SET_PIN_MODE,
            Command::DigitalMessage => DIGITAL_MESSAGE,
            Command::AnalogMessage => ANALOG_MESSAGE,
            Command::ReportAnalog => REPORT_ANALOG,
            Command::ReportDigital => REPORT_DIGITAL,
            Command::ReportVersion => REPORT_VERSION,
            Command::SystemReset => SYSTEM_RESET,
            Command::StartSysex => START_SYSEX,
            Command::EndSysex => END_SYSEX,
        }
    }

    /// Look up a command by its wire code
    ///
    /// `code` must already have its channel nibble stripped for
    /// channel-qualified commands; see [`Header::parse`].
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            SET_PIN_MODE => Some(Command::SetPinMode),
            DIGITAL_MESSAGE => Some(Command::DigitalMessage),
            ANALOG_MESSAGE => Some(Command::AnalogMessage),
            REPORT_ANALOG => Some(Command::ReportAnalog),
            REPORT_DIGITAL => Some(Command::ReportDigital),
            REPORT_VERSION => Some(Command::ReportVersion),
            SYSTEM_RESET => Some(Command::SystemReset),
            START_SYSEX => Some(Command::StartSysex),
            END_SYSEX => Some(Command::EndSysex),
            _ => None,
        }
    }

    /// Number of 7-bit data bytes the board sends after this header
    ///
    /// Only the commands the decoder acts on are counted; sysex is
    /// variable-length and reported as zero.
    pub const fn data_len(self) -> u8 {
        match self {
            Command::DigitalMessage | Command::AnalogMessage | Command::ReportVersion => 2,
            _ => 0,
        }
    }
}

/// A command header split into its code and channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Header {
    /// Command code with the channel nibble cleared
    pub code: u8,
    /// Channel for channel-qualified headers
    pub channel: Option<u8>,
}

impl Header {
    /// Split a header byte at the `0xF0` boundary
    pub const fn parse(byte: u8) -> Self {
        if byte < CHANNEL_LESS_BASE {
            Self {
                code: byte & 0xF0,
                channel: Some(byte & 0x0F),
            }
        } else {
            Self {
                code: byte,
                channel: None,
            }
        }
    }

    /// The command this header names, if it is one we know
    pub fn command(&self) -> Option<Command> {
        Command::from_code(self.code)
    }
}

/// Returns true if `byte` can travel as a data byte
pub const fn is_data(byte: u8) -> bool {
    byte & COMMAND_BIT == 0
}

//! Stream decoder for board-to-host messages
//!
//! The decoder is fed one byte at a time and never fails. Bytes it does not
//! understand are ignored; there is no checksum or resynchronisation in this
//! protocol, so a dropped byte can shift the stream until a later header
//! happens to line it back up.
//!
//! States:
//! - `Idle`: next byte is read as a command header
//! - `AwaitingData`: collecting the data bytes of a multi-byte command
//! - `Sysex`: collecting a sysex body until `END_SYSEX`

use heapless::Vec;
use pinwire_hal::ByteListener;

use crate::command::{is_data, Command, Header, END_SYSEX};
use crate::events::{DecodeEvent, FirmwareVersion};
use crate::layout::BoardLayout;
use crate::store::PinState;

/// Size of the accumulation buffer shared by data and sysex bytes
pub const MAX_DATA_BYTES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Waiting for a command header
    Idle,
    /// Got a multi-byte header, `remaining` data bytes still to come
    AwaitingData {
        command: Command,
        channel: u8,
        remaining: u8,
    },
    /// Inside a sysex block
    Sysex { bytes_read: usize },
}

/// State machine turning the board's byte stream into pin state
#[derive(Debug, Clone)]
pub struct Decoder {
    state: DecodeState,
    buffer: Vec<u8, MAX_DATA_BYTES>,
    pins: PinState,
    version: Option<FirmwareVersion>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(&BoardLayout::default())
    }
}

impl Decoder {
    /// Create a decoder whose pin store matches `layout`
    pub fn new(layout: &BoardLayout) -> Self {
        Self {
            state: DecodeState::Idle,
            buffer: Vec::new(),
            pins: PinState::new(layout),
            version: None,
        }
    }

    /// Abandon any partially received command or sysex block
    ///
    /// Pin state and the firmware version are kept.
    pub fn reset(&mut self) {
        self.state = DecodeState::Idle;
        self.buffer.clear();
    }

    /// Abandon partial input and forget every reported input value
    ///
    /// Use after resetting the board: until it reports again, all inputs
    /// read low and zero. The firmware version is kept.
    pub fn clear(&mut self) {
        self.reset();
        self.pins.clear();
    }

    /// Returns true between commands
    pub fn is_idle(&self) -> bool {
        self.state == DecodeState::Idle
    }

    /// Returns true while inside a sysex block
    pub fn in_sysex(&self) -> bool {
        matches!(self.state, DecodeState::Sysex { .. })
    }

    /// Last known pin state
    pub fn pins(&self) -> &PinState {
        &self.pins
    }

    /// Firmware version, once the board has reported one
    pub fn version(&self) -> Option<FirmwareVersion> {
        self.version
    }

    /// Body of the most recent sysex block (at most [`MAX_DATA_BYTES`])
    ///
    /// While a block is still being received this is the part read so far.
    /// The buffer is shared with multi-byte commands, so the payload is gone
    /// once the next one starts.
    pub fn sysex_payload(&self) -> &[u8] {
        match self.state {
            DecodeState::AwaitingData { .. } => &[],
            _ => &self.buffer,
        }
    }

    /// Feed a single byte to the decoder
    ///
    /// Returns the event completed by this byte, if any. The pin store is
    /// already updated when the event is returned.
    pub fn feed(&mut self, byte: u8) -> Option<DecodeEvent> {
        match self.state {
            DecodeState::Sysex { bytes_read } => self.feed_sysex(byte, bytes_read),
            DecodeState::AwaitingData {
                command,
                channel,
                remaining,
            } if is_data(byte) => {
                // This cannot fail, the buffer holds far more than 2 bytes
                let _ = self.buffer.push(byte);
                if remaining > 1 {
                    self.state = DecodeState::AwaitingData {
                        command,
                        channel,
                        remaining: remaining - 1,
                    };
                    return None;
                }

                self.state = DecodeState::Idle;
                let event = self.dispatch(command, channel);
                self.buffer.clear();
                event
            }
            _ => {
                self.feed_header(byte);
                None
            }
        }
    }

    /// Iterate over the events produced by feeding `bytes`
    ///
    /// Bytes are consumed lazily as the iterator advances.
    pub fn events<'a>(&'a mut self, bytes: &'a [u8]) -> Events<'a> {
        Events {
            decoder: self,
            bytes: bytes.iter(),
        }
    }

    /// Feed every byte of `bytes`, discarding the events
    pub fn feed_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            let _ = self.feed(byte);
        }
    }

    fn feed_sysex(&mut self, byte: u8, bytes_read: usize) -> Option<DecodeEvent> {
        if byte == END_SYSEX {
            self.state = DecodeState::Idle;
            let truncated = bytes_read > MAX_DATA_BYTES;
            #[cfg(feature = "defmt")]
            if truncated {
                defmt::warn!(
                    "sysex body of {} bytes truncated to {}",
                    bytes_read,
                    MAX_DATA_BYTES
                );
            }
            return Some(DecodeEvent::Sysex {
                len: bytes_read,
                truncated,
            });
        }

        // Past the buffer the bytes are counted but dropped
        let _ = self.buffer.push(byte);
        self.state = DecodeState::Sysex {
            bytes_read: bytes_read.saturating_add(1),
        };
        None
    }

    fn feed_header(&mut self, byte: u8) {
        let header = Header::parse(byte);

        match header.command() {
            Some(Command::StartSysex) => {
                self.buffer.clear();
                self.state = DecodeState::Sysex { bytes_read: 0 };
            }
            Some(
                command @ (Command::DigitalMessage
                | Command::AnalogMessage
                | Command::ReportVersion),
            ) => {
                self.buffer.clear();
                self.state = DecodeState::AwaitingData {
                    command,
                    channel: header.channel.unwrap_or(0),
                    remaining: command.data_len(),
                };
            }
            // Host-bound commands, END_SYSEX outside a block, unknown codes
            // and stray data bytes: accepted, nothing changes
            _ => {
                #[cfg(feature = "defmt")]
                defmt::trace!("ignoring byte {=u8:#x}", byte);
            }
        }
    }

    fn dispatch(&mut self, command: Command, channel: u8) -> Option<DecodeEvent> {
        let (first, second) = match self.buffer.as_slice() {
            [first, second] => (*first, *second),
            _ => return None,
        };

        match command {
            Command::DigitalMessage => {
                let value = (u16::from(first) | (u16::from(second) << 7)) as u8;
                match self.pins.set_digital_port(channel, value) {
                    Ok(()) => Some(DecodeEvent::DigitalPort {
                        port: channel,
                        value,
                    }),
                    Err(_e) => {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("dropping digital report: {}", _e);
                        None
                    }
                }
            }
            Command::AnalogMessage => {
                let value = u16::from(first) | (u16::from(second) << 7);
                match self.pins.set_analog_channel(channel, value) {
                    Ok(()) => Some(DecodeEvent::AnalogChannel { channel, value }),
                    Err(_e) => {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("dropping analog report: {}", _e);
                        None
                    }
                }
            }
            Command::ReportVersion => {
                // Wire order is minor, major
                let version = FirmwareVersion::new(second, first);
                #[cfg(feature = "defmt")]
                defmt::debug!("firmware version {}.{}", version.major, version.minor);
                self.version = Some(version);
                Some(DecodeEvent::Version(version))
            }
            _ => None,
        }
    }
}

impl ByteListener for Decoder {
    type Output = Option<DecodeEvent>;

    fn on_byte(&mut self, byte: u8) -> Self::Output {
        self.feed(byte)
    }
}

/// Iterator returned by [`Decoder::events`]
pub struct Events<'a> {
    decoder: &'a mut Decoder,
    bytes: core::slice::Iter<'a, u8>,
}

impl Iterator for Events<'_> {
    type Item = DecodeEvent;

    fn next(&mut self) -> Option<Self::Item> {
        for &byte in self.bytes.by_ref() {
            if let Some(event) = self.decoder.feed(byte) {
                return Some(event);
            }
        }
        None
    }
}

//! Events reconstructed from the board's byte stream

/// Firmware version reported by the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FirmwareVersion {
    pub major: u8,
    pub minor: u8,
}

impl FirmwareVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

/// A completed message from the board
///
/// Each event has already been applied to the decoder's pin state by the
/// time it is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeEvent {
    /// New value for all 8 pins of a digital port
    DigitalPort { port: u8, value: u8 },
    /// New reading of an analog channel
    AnalogChannel { channel: u8, value: u16 },
    /// Firmware version report
    Version(FirmwareVersion),
    /// A sysex block ended
    ///
    /// `len` counts every body byte received; only the first
    /// [`MAX_DATA_BYTES`](crate::decoder::MAX_DATA_BYTES) are kept, and
    /// `truncated` is set when some were dropped.
    Sysex { len: usize, truncated: bool },
}

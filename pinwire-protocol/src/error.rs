//! Error types

/// A pin, port or channel argument the board layout does not have
///
/// These are caller mistakes, never protocol errors: the decoder does not
/// produce them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Digital pin beyond the last configured port
    PinOutOfRange { pin: u8, pins: u8 },
    /// Digital port index beyond the configured port count
    PortOutOfRange { port: u8, ports: u8 },
    /// Analog channel beyond the configured channel count
    ChannelOutOfRange { channel: u8, channels: u8 },
    /// Value that must travel as a raw data byte has bit 7 set
    NotSevenBit(u8),
}

/// Errors from operations that write to the link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<E> {
    /// The transport failed to write
    Transport(E),
    /// An argument did not fit the board layout
    Pin(PinError),
}

impl<E> From<PinError> for LinkError<E> {
    fn from(err: PinError) -> Self {
        LinkError::Pin(err)
    }
}

/// Invalid board layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayoutError {
    /// More ports than a 4-bit channel can address
    TooManyPorts(u8),
    /// More analog channels than a 4-bit channel can address
    TooManyChannels(u8),
    /// Report burst covers ports that do not exist
    ReportedPortsExceedPorts { reported: u8, ports: u8 },
    /// Report burst covers channels that do not exist
    ReportedChannelsExceedChannels { reported: u8, channels: u8 },
}

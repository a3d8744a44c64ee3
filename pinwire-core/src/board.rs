//! A remote board behind a serial link
//!
//! [`Board`] owns both halves of the transport together with an encoder and
//! a decoder, and exposes the pin capability traits. It suits a single
//! task that alternates between writing commands and polling for input.
//! When reading and writing happen on different tasks, [`Board::split`] it
//! and wrap the encoder in a [`SharedEncoder`](crate::SharedEncoder).

use pinwire_hal::{AnalogPins, DigitalPins, PinMode, PinModeControl, UartRx, UartTx};
use pinwire_protocol::{
    BoardLayout, DecodeEvent, Decoder, Encoder, FirmwareVersion, LinkError, PinState,
};

use crate::config::{BoardConfig, ConfigError};

/// Remote board driven over a serial link
pub struct Board<Tx, Rx> {
    encoder: Encoder<Tx>,
    decoder: Decoder,
    rx: Rx,
}

impl<Tx: UartTx, Rx: UartRx> Board<Tx, Rx> {
    /// Create a board for the given layout
    pub fn new(tx: Tx, rx: Rx, layout: &BoardLayout) -> Self {
        Self {
            encoder: Encoder::new(tx, layout),
            decoder: Decoder::new(layout),
            rx,
        }
    }

    /// Create a board from a validated configuration
    pub fn from_config(tx: Tx, rx: Rx, config: &BoardConfig) -> Result<Self, ConfigError> {
        let layout = config.layout()?;
        Ok(Self::new(tx, rx, &layout))
    }

    /// Read one byte from the link and decode it
    ///
    /// Blocks for as long as the transport's read does.
    pub fn poll(&mut self) -> Result<Option<DecodeEvent>, Rx::Error> {
        let event = self.rx.deliver(&mut self.decoder)?;
        #[cfg(feature = "defmt")]
        if let Some(event) = &event {
            defmt::debug!("RX {}", event);
        }
        Ok(event)
    }

    /// Read and decode up to `max_bytes` bytes, stopping at the first event
    pub fn poll_n(&mut self, max_bytes: usize) -> Result<Option<DecodeEvent>, Rx::Error> {
        for _ in 0..max_bytes {
            if let Some(event) = self.poll()? {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }

    /// Enable input reporting for the channels and ports in the layout
    ///
    /// Boards running Firmata reset when the port opens and ignore input
    /// until their sketch has started. Call this once, after waiting
    /// [`BoardConfig::startup_delay_ms`] from connecting.
    pub fn start_reporting(&mut self) -> Result<(), LinkError<Tx::Error>> {
        #[cfg(feature = "defmt")]
        defmt::info!(
            "enabling reports: {} analog channels, {} digital ports",
            self.encoder.layout().reported_analog_channels(),
            self.encoder.layout().reported_digital_ports()
        );
        self.encoder.request_reports()
    }

    /// Ask the board for its firmware version
    ///
    /// The answer arrives through [`Board::poll`].
    pub fn request_version(&mut self) -> Result<(), LinkError<Tx::Error>> {
        self.encoder.request_version()
    }

    /// Firmware version, once the board has reported one
    pub fn firmware_version(&self) -> Option<FirmwareVersion> {
        self.decoder.version()
    }

    /// Reset the board
    ///
    /// Any partially received input is abandoned and the input store is
    /// zeroed; pins read low until the board reports again, which needs a
    /// new [`Board::start_reporting`].
    pub fn system_reset(&mut self) -> Result<(), LinkError<Tx::Error>> {
        self.encoder.system_reset()?;
        self.decoder.clear();
        Ok(())
    }

    /// Last known input state
    pub fn pins(&self) -> &PinState {
        self.decoder.pins()
    }

    /// The board's encoder
    pub fn encoder(&mut self) -> &mut Encoder<Tx> {
        &mut self.encoder
    }

    /// The board's decoder
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Take the board apart for use from separate reader/writer tasks
    pub fn split(self) -> (Encoder<Tx>, Decoder, Rx) {
        (self.encoder, self.decoder, self.rx)
    }
}

impl<Tx: UartTx, Rx: UartRx> PinModeControl for Board<Tx, Rx> {
    type Error = LinkError<Tx::Error>;

    fn set_pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), Self::Error> {
        self.encoder.pin_mode(pin, mode)
    }
}

impl<Tx: UartTx, Rx: UartRx> DigitalPins for Board<Tx, Rx> {
    type Error = LinkError<Tx::Error>;

    fn digital_read(&self, pin: u8) -> Result<bool, Self::Error> {
        Ok(self.decoder.pins().read_digital_pin(pin)?)
    }

    fn digital_write(&mut self, pin: u8, high: bool) -> Result<(), Self::Error> {
        self.encoder.digital_write(pin, high)
    }
}

impl<Tx: UartTx, Rx: UartRx> AnalogPins for Board<Tx, Rx> {
    type Error = LinkError<Tx::Error>;

    fn analog_read(&self, channel: u8) -> Result<u16, Self::Error> {
        Ok(self.decoder.pins().read_analog_channel(channel)?)
    }

    fn analog_write(&mut self, pin: u8, duty: u8) -> Result<(), Self::Error> {
        self.encoder.analog_write(pin, duty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinwire_hal::RemoteBoard;
    use pinwire_protocol::PinError;
    use std::collections::VecDeque;
    use std::vec::Vec;

    /// Mock transmit half recording every byte
    #[derive(Default)]
    struct MockTx {
        written: Vec<u8>,
    }

    impl UartTx for MockTx {
        type Error = ();

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
            self.written.extend_from_slice(data);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), ()> {
            Ok(())
        }
    }

    /// Mock receive half replaying queued bytes, failing once drained
    #[derive(Default)]
    struct MockRx {
        queue: VecDeque<u8>,
    }

    impl MockRx {
        fn with(bytes: &[u8]) -> Self {
            Self {
                queue: bytes.iter().copied().collect(),
            }
        }
    }

    #[derive(Debug, PartialEq)]
    struct Drained;

    impl UartRx for MockRx {
        type Error = Drained;

        fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Drained> {
            let byte = self.queue.pop_front().ok_or(Drained)?;
            buf[0] = byte;
            Ok(1)
        }
    }

    fn board(input: &[u8]) -> Board<MockTx, MockRx> {
        Board::new(MockTx::default(), MockRx::with(input), &BoardLayout::default())
    }

    #[test]
    fn test_poll_decodes_events() {
        let mut board = board(&[0x91, 0x20, 0x00, 0xE3, 0x7F, 0x03]);

        assert_eq!(board.poll(), Ok(None));
        assert_eq!(board.poll(), Ok(None));
        assert_eq!(
            board.poll(),
            Ok(Some(DecodeEvent::DigitalPort {
                port: 1,
                value: 0x20
            }))
        );
        assert_eq!(
            board.poll_n(8),
            Ok(Some(DecodeEvent::AnalogChannel {
                channel: 3,
                value: 511
            }))
        );
        assert_eq!(board.poll(), Err(Drained));

        assert_eq!(board.digital_read(13), Ok(true));
        assert_eq!(board.is_low(12), Ok(true));
        assert_eq!(board.analog_read(3), Ok(511));
    }

    #[test]
    fn test_poll_n_without_event() {
        let mut board = board(&[0xF0, 0x01, 0x02, 0x03]);
        assert_eq!(board.poll_n(3), Ok(None));
        assert!(board.decoder().in_sysex());
    }

    #[test]
    fn test_version_query() {
        let mut board = board(&[0xF9, 2, 9]);
        board.request_version().unwrap();
        assert_eq!(board.encoder().transport().written, [0xF9]);

        assert_eq!(board.firmware_version(), None);
        let event = board.poll_n(3).unwrap();
        assert_eq!(
            event,
            Some(DecodeEvent::Version(FirmwareVersion::new(9, 2)))
        );
        assert_eq!(board.firmware_version(), Some(FirmwareVersion::new(9, 2)));
    }

    #[test]
    fn test_capability_writes() {
        let mut board = board(&[]);
        board.set_pin_mode(13, PinMode::Output).unwrap();
        board.digital_write(13, true).unwrap();
        board.analog_write(10, 128).unwrap();

        assert_eq!(
            board.encoder().transport().written,
            [
                0xF4, 13, 0x01, // pin mode
                0x91, 0x20, 0x00, // port 1
                0xF4, 10, 0x03, 0xEA, 0x00, 0x01, // pwm on pin 10
            ]
        );
    }

    #[test]
    fn test_start_reporting() {
        let config = BoardConfig {
            digital_ports: 3,
            analog_channels: 6,
            reported_digital_ports: 3,
            reported_analog_channels: 2,
            ..BoardConfig::default()
        };
        let mut board = Board::from_config(MockTx::default(), MockRx::default(), &config).unwrap();
        board.start_reporting().unwrap();
        assert_eq!(
            board.encoder().transport().written,
            [0xC0, 1, 0xC1, 1, 0xD0, 1, 0xD1, 1, 0xD2, 1]
        );
    }

    #[test]
    fn test_from_invalid_config() {
        let config = BoardConfig {
            analog_channels: 17,
            ..BoardConfig::default()
        };
        assert!(Board::from_config(MockTx::default(), MockRx::default(), &config).is_err());
    }

    #[test]
    fn test_out_of_range_reads() {
        let layout = BoardLayout::new(2, 6, 2, 6).unwrap();
        let board = Board::new(MockTx::default(), MockRx::default(), &layout);
        assert_eq!(
            board.digital_read(20),
            Err(LinkError::Pin(PinError::PinOutOfRange { pin: 20, pins: 16 }))
        );
        assert_eq!(
            board.analog_read(6),
            Err(LinkError::Pin(PinError::ChannelOutOfRange {
                channel: 6,
                channels: 6
            }))
        );
    }

    #[test]
    fn test_system_reset_abandons_partial_input() {
        let mut board = board(&[0xE0, 0x10]);
        board.poll_n(2).unwrap();
        assert!(!board.decoder().is_idle());

        board.system_reset().unwrap();
        assert!(board.decoder().is_idle());
        assert_eq!(board.encoder().transport().written, [0xFF]);
    }

    #[test]
    fn test_system_reset_forgets_reported_inputs() {
        let mut board = board(&[0x91, 0x20, 0x00, 0xE1, 0x7F, 0x07]);
        board.digital_write(13, true).unwrap();
        board.poll_n(3).unwrap();
        board.poll_n(3).unwrap();
        assert_eq!(board.digital_read(13), Ok(true));
        assert_eq!(board.analog_read(1), Ok(1023));

        board.system_reset().unwrap();
        assert_eq!(board.digital_read(13), Ok(false));
        assert_eq!(board.analog_read(1), Ok(0));
        assert_eq!(board.encoder().output_port(1), Ok(0));
    }

    #[test]
    fn test_generic_remote_board() {
        fn blink<B: RemoteBoard>(board: &mut B) -> Result<(), <B as DigitalPins>::Error> {
            board.digital_write(13, true)?;
            board.digital_write(13, false)
        }

        let mut board = board(&[]);
        blink(&mut board).unwrap();
        assert_eq!(
            board.encoder().transport().written,
            [0x91, 0x20, 0x00, 0x91, 0x00, 0x00]
        );
    }

    #[test]
    fn test_split() {
        let board = board(&[0x90, 0x01, 0x00]);
        let (mut encoder, mut decoder, mut rx) = board.split();

        encoder.digital_write(0, true).unwrap();
        for _ in 0..3 {
            rx.deliver(&mut decoder).unwrap();
        }
        assert_eq!(decoder.pins().read_digital_pin(0), Ok(true));
        assert_eq!(encoder.transport().written, [0x90, 0x01, 0x00]);
    }
}

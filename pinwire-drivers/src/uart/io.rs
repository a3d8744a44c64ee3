//! `embedded-io` transport
//!
//! Wraps anything implementing `embedded_io::Read` and/or
//! `embedded_io::Write` so it can carry protocol traffic.

use embedded_io::{ErrorType, Read, Write};
use pinwire_hal::{UartRx, UartTx};

/// Errors from an [`IoUart`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoUartError<E> {
    /// The underlying stream failed
    Io(E),
    /// The stream reported end of input
    ///
    /// A serial line never ends, so this means the port went away.
    EndOfStream,
}

/// UART transport over an `embedded-io` stream
pub struct IoUart<T> {
    io: T,
}

impl<T> IoUart<T> {
    /// Wrap a stream
    pub fn new(io: T) -> Self {
        Self { io }
    }

    /// Borrow the stream
    pub fn inner(&self) -> &T {
        &self.io
    }

    /// Mutably borrow the stream
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.io
    }

    /// Give back the stream
    pub fn into_inner(self) -> T {
        self.io
    }
}

impl<T: Write> UartTx for IoUart<T> {
    type Error = IoUartError<<T as ErrorType>::Error>;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.io.write_all(data).map_err(IoUartError::Io)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.io.flush().map_err(IoUartError::Io)
    }
}

impl<T: Read> UartRx for IoUart<T> {
    type Error = IoUartError<<T as ErrorType>::Error>;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.io.read(buf) {
            Ok(0) => Err(IoUartError::EndOfStream),
            Ok(n) => Ok(n),
            Err(e) => Err(IoUartError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinwire_protocol::{DecodeEvent, Decoder, Encoder};

    #[test]
    fn test_read_bytes_then_end_of_stream() {
        let mut uart = IoUart::new(&[0x91u8, 0x05][..]);
        assert_eq!(uart.read_byte(), Ok(0x91));
        assert_eq!(uart.read_byte(), Ok(0x05));
        assert_eq!(uart.read_byte(), Err(IoUartError::EndOfStream));
    }

    #[test]
    fn test_deliver_into_decoder() {
        let stream = [0xE2u8, 0x7F, 0x07, 0xF9, 0x03, 0x02];
        let mut uart = IoUart::new(&stream[..]);
        let mut decoder = Decoder::default();

        let mut events = std::vec::Vec::new();
        while let Ok(event) = uart.deliver(&mut decoder) {
            events.extend(event);
        }

        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            DecodeEvent::AnalogChannel {
                channel: 2,
                value: 0x3FF
            }
        );
        assert_eq!(decoder.pins().read_analog_channel(2), Ok(1023));
        assert_eq!(decoder.version().map(|v| (v.major, v.minor)), Some((2, 3)));
    }

    #[test]
    fn test_write_through_encoder() {
        let mut buf = [0u8; 6];
        {
            let uart = IoUart::new(&mut buf[..]);
            let mut encoder = Encoder::new(uart, &Default::default());
            encoder.digital_write(4, true).unwrap();
            encoder.request_version().unwrap();
            encoder.flush().unwrap();
        }
        assert_eq!(buf, [0x90, 0x10, 0x00, 0xF9, 0x00, 0x00]);
    }

    #[test]
    fn test_write_past_end_fails() {
        let mut buf = [0u8; 2];
        let mut uart = IoUart::new(&mut buf[..]);
        assert!(matches!(
            uart.write_blocking(&[0xF4, 13, 1]),
            Err(IoUartError::Io(_))
        ));
    }
}

//! UART serial transport abstractions
//!
//! The protocol code never opens, configures or closes a port. It only
//! needs to push bytes out and pull bytes in, one at a time if necessary.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

impl<T: UartTx + ?Sized> UartTx for &mut T {
    type Error = T::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_blocking(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}

/// Something that consumes bytes handed to it by a receiver
///
/// This is the registration hook between a transport and a decoder: the
/// read loop owns both and calls [`UartRx::deliver`] with the listener it
/// wants the next byte to go to.
pub trait ByteListener {
    /// What the listener produces for each byte
    type Output;

    /// Consume one received byte
    fn on_byte(&mut self, byte: u8) -> Self::Output;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read data from the UART
    ///
    /// Blocks until at least one byte is available or an error occurs.
    /// Returns the number of bytes written into `buf`.
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Read a single byte from the UART
    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        loop {
            if self.read_blocking(&mut buf)? == 1 {
                return Ok(buf[0]);
            }
        }
    }

    /// Read one byte and hand it to `listener`
    fn deliver<L: ByteListener>(&mut self, listener: &mut L) -> Result<L::Output, Self::Error> {
        let byte = self.read_byte()?;
        Ok(listener.on_byte(byte))
    }
}

impl<T: UartRx + ?Sized> UartRx for &mut T {
    type Error = T::Error;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read_blocking(buf)
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl UartConfig {
    /// Baud rate the standard Firmata sketches listen on
    pub const FIRMATA_BAUDRATE: u32 = 57_600;

    /// 8N1 at the given baud rate
    pub const fn with_baudrate(baudrate: u32) -> Self {
        Self {
            baudrate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::with_baudrate(Self::FIRMATA_BAUDRATE)
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Receiver that hands out a fixed script, sometimes zero bytes at a time
    struct ScriptedRx {
        script: &'static [u8],
        pos: usize,
        stall_next: bool,
    }

    impl UartRx for ScriptedRx {
        type Error = ();

        fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
            if self.stall_next {
                self.stall_next = false;
                return Ok(0);
            }
            if self.pos >= self.script.len() {
                return Err(());
            }
            buf[0] = self.script[self.pos];
            self.pos += 1;
            self.stall_next = true;
            Ok(1)
        }
    }

    struct Doubler;

    impl ByteListener for Doubler {
        type Output = u16;

        fn on_byte(&mut self, byte: u8) -> u16 {
            u16::from(byte) * 2
        }
    }

    #[test]
    fn test_read_byte_skips_empty_reads() {
        let mut rx = ScriptedRx {
            script: &[0x91, 0x05],
            pos: 0,
            stall_next: true,
        };
        assert_eq!(rx.read_byte(), Ok(0x91));
        assert_eq!(rx.read_byte(), Ok(0x05));
        assert_eq!(rx.read_byte(), Err(()));
    }

    #[test]
    fn test_deliver_hands_byte_to_listener() {
        let mut rx = ScriptedRx {
            script: &[200],
            pos: 0,
            stall_next: false,
        };
        let mut listener = Doubler;
        assert_eq!(rx.deliver(&mut listener), Ok(400));
        assert_eq!(rx.deliver(&mut listener), Err(()));
    }

    #[test]
    fn test_default_config_is_firmata_8n1() {
        let config = UartConfig::default();
        assert_eq!(config.baudrate, 57_600);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
    }
}

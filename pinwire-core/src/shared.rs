//! Encoder shared between tasks
//!
//! A digital write is a read-modify-write of the port mirror followed by a
//! three-byte transport write. If two tasks interleave those steps the
//! mirror loses a bit or the wire carries half a message, so each encoder
//! operation runs inside one critical section.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use pinwire_hal::{PinMode, UartTx};
use pinwire_protocol::{Encoder, LinkError, PinError};

/// An [`Encoder`] usable from several tasks at once
pub struct SharedEncoder<T> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Encoder<T>>>,
}

impl<T: UartTx> SharedEncoder<T> {
    /// Wrap an encoder
    pub fn new(encoder: Encoder<T>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(encoder)),
        }
    }

    /// Run `f` with exclusive access to the encoder
    ///
    /// `f` runs inside a critical section, which on a single-core target
    /// masks interrupts. At 57600 baud each message byte holds them off
    /// for about 170 us, so keep `f` to one message or two.
    pub fn lock<R>(&self, f: impl FnOnce(&mut Encoder<T>) -> R) -> R {
        self.inner.lock(|cell| f(&mut *cell.borrow_mut()))
    }

    /// See [`Encoder::pin_mode`]
    pub fn pin_mode(&self, pin: u8, mode: PinMode) -> Result<(), LinkError<T::Error>> {
        self.lock(|encoder| encoder.pin_mode(pin, mode))
    }

    /// See [`Encoder::digital_write`]
    pub fn digital_write(&self, pin: u8, high: bool) -> Result<(), LinkError<T::Error>> {
        self.lock(|encoder| encoder.digital_write(pin, high))
    }

    /// See [`Encoder::analog_write`]
    ///
    /// The mode change and the value go out back to back.
    pub fn analog_write(&self, pin: u8, value: u8) -> Result<(), LinkError<T::Error>> {
        self.lock(|encoder| encoder.analog_write(pin, value))
    }

    /// See [`Encoder::report_analog`]
    pub fn report_analog(&self, channel: u8, enable: bool) -> Result<(), LinkError<T::Error>> {
        self.lock(|encoder| encoder.report_analog(channel, enable))
    }

    /// See [`Encoder::report_digital`]
    pub fn report_digital(&self, port: u8, enable: bool) -> Result<(), LinkError<T::Error>> {
        self.lock(|encoder| encoder.report_digital(port, enable))
    }

    /// Deferred report-enable burst, see [`Encoder::request_reports`]
    ///
    /// Each enable takes the lock on its own, so other tasks may slip
    /// whole messages in between.
    pub fn request_reports(&self) -> Result<(), LinkError<T::Error>> {
        let layout = self.lock(|encoder| *encoder.layout());
        for channel in 0..layout.reported_analog_channels() {
            self.report_analog(channel, true)?;
        }
        for port in 0..layout.reported_digital_ports() {
            self.report_digital(port, true)?;
        }
        Ok(())
    }

    /// See [`Encoder::request_version`]
    pub fn request_version(&self) -> Result<(), LinkError<T::Error>> {
        self.lock(|encoder| encoder.request_version())
    }

    /// See [`Encoder::system_reset`]
    pub fn system_reset(&self) -> Result<(), LinkError<T::Error>> {
        self.lock(|encoder| encoder.system_reset())
    }

    /// See [`Encoder::output_port`]
    pub fn output_port(&self, port: u8) -> Result<u8, PinError> {
        self.lock(|encoder| encoder.output_port(port))
    }

    /// Unwrap the encoder
    pub fn into_inner(self) -> Encoder<T> {
        self.inner.into_inner().into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinwire_protocol::{BoardLayout, DecodeEvent, Decoder};
    use std::vec::Vec;

    /// Transmit half that writes one byte at a time, yielding in between,
    /// so unguarded callers would interleave
    #[derive(Default)]
    struct SlowTx {
        written: Vec<u8>,
    }

    impl UartTx for SlowTx {
        type Error = ();

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
            for &byte in data {
                self.written.push(byte);
                std::thread::yield_now();
            }
            Ok(())
        }

        fn flush(&mut self) -> Result<(), ()> {
            Ok(())
        }
    }

    fn shared() -> SharedEncoder<SlowTx> {
        SharedEncoder::new(Encoder::new(SlowTx::default(), &BoardLayout::default()))
    }

    #[test]
    fn test_concurrent_writers_keep_messages_whole() {
        let encoder = shared();

        std::thread::scope(|s| {
            s.spawn(|| {
                for i in 0..200u32 {
                    encoder.digital_write(2, i % 2 == 0).unwrap();
                }
            });
            s.spawn(|| {
                for i in 0..200u32 {
                    encoder.digital_write(5, i % 3 == 0).unwrap();
                }
            });
            s.spawn(|| {
                for i in 0..100u32 {
                    encoder.digital_write(9, i % 2 == 1).unwrap();
                }
            });
        });

        let encoder = encoder.into_inner();
        let written = &encoder.transport().written;
        assert_eq!(written.len(), 500 * 3);
        for message in written.chunks(3) {
            assert!(message[0] == 0x90 || message[0] == 0x91);
            assert!(message[1] < 0x80 && message[2] < 0x80);
        }

        // Final mirror: pin 2 low (199 odd), pin 5 low (199 % 3 != 0), pin 9 high
        assert_eq!(encoder.output_port(0), Ok(0));
        assert_eq!(encoder.output_port(1), Ok(0b0000_0010));

        // The wire agrees with the mirror
        let mut decoder = Decoder::default();
        let last_port0 = decoder
            .events(written)
            .filter_map(|event| match event {
                DecodeEvent::DigitalPort { port: 0, value } => Some(value),
                _ => None,
            })
            .last();
        assert_eq!(last_port0, Some(0));
        assert_eq!(decoder.pins().digital_port(1), Ok(0b0000_0010));
    }

    #[test]
    fn test_report_burst_through_shared_encoder() {
        let encoder = shared();
        encoder.request_reports().unwrap();
        encoder.request_version().unwrap();
        let encoder = encoder.into_inner();
        assert_eq!(encoder.transport().written.len(), 8 * 2 + 1);
        assert_eq!(encoder.transport().written.last(), Some(&0xF9));
    }

    #[test]
    fn test_report_burst_interleaves_whole_messages() {
        let encoder = shared();

        std::thread::scope(|s| {
            s.spawn(|| {
                for _ in 0..50 {
                    encoder.request_reports().unwrap();
                }
            });
            s.spawn(|| {
                for i in 0..200u32 {
                    encoder.digital_write(12, i % 2 == 0).unwrap();
                }
            });
        });

        let encoder = encoder.into_inner();
        let written = &encoder.transport().written;
        let mut pos = 0;
        let mut reports = std::vec::Vec::new();
        while pos < written.len() {
            match written[pos] & 0xF0 {
                0xC0 | 0xD0 => {
                    assert_eq!(written[pos + 1], 1);
                    reports.push(written[pos]);
                    pos += 2;
                }
                0x90 => {
                    assert_eq!(written[pos], 0x91);
                    pos += 3;
                }
                other => panic!("unexpected header {other:#x}"),
            }
        }
        assert_eq!(pos, written.len());

        // Each burst still goes out in order
        let burst = [0xC0, 0xC1, 0xC2, 0xC3, 0xC4, 0xC5, 0xD0, 0xD1];
        assert_eq!(reports.len(), 50 * burst.len());
        for chunk in reports.chunks(burst.len()) {
            assert_eq!(chunk, burst);
        }
    }

    #[test]
    fn test_lock_gives_direct_access() {
        let encoder = shared();
        encoder.pin_mode(3, PinMode::Pwm).unwrap();
        encoder.analog_write(3, 255).unwrap();
        let written = encoder.lock(|enc| enc.transport().written.clone());
        assert_eq!(written, [0xF4, 3, 0x03, 0xF4, 3, 0x03, 0xE3, 0x7F, 0x01]);
        encoder.system_reset().unwrap();
        assert_eq!(encoder.output_port(0), Ok(0));
    }
}

//! Host-to-board command encoder
//!
//! Digital writes are per pin but the wire message is per port, so the
//! encoder keeps a mirror of the last value written to each port and sends
//! the whole port every time. Every operation goes straight to the
//! transport; nothing is buffered.

use heapless::Vec;
use pinwire_hal::{PinMode, UartTx};

use crate::command::DATA_MASK;
use crate::error::{LinkError, PinError};
use crate::layout::{BoardLayout, MAX_PORTS, PINS_PER_PORT};
use crate::message::Message;

/// Encodes commands and writes them to a transport
#[derive(Debug)]
pub struct Encoder<T> {
    tx: T,
    layout: BoardLayout,
    outputs: Vec<u8, MAX_PORTS>,
}

impl<T: UartTx> Encoder<T> {
    /// Create an encoder writing to `tx`, all outputs low
    pub fn new(tx: T, layout: &BoardLayout) -> Self {
        let mut outputs = Vec::new();
        // BoardLayout guarantees the port count fits
        let _ = outputs.resize(usize::from(layout.digital_ports()), 0);
        Self {
            tx,
            layout: *layout,
            outputs,
        }
    }

    /// Layout this encoder was built for
    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    /// Last value written to a port's outputs
    pub fn output_port(&self, port: u8) -> Result<u8, PinError> {
        self.outputs
            .get(usize::from(port))
            .copied()
            .ok_or(PinError::PortOutOfRange {
                port,
                ports: self.layout.digital_ports(),
            })
    }

    /// Borrow the transport
    pub fn transport(&self) -> &T {
        &self.tx
    }

    /// Mutably borrow the transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.tx
    }

    /// Give back the transport
    pub fn into_inner(self) -> T {
        self.tx
    }

    /// Encode and send a single message
    pub fn send(&mut self, message: &Message) -> Result<(), LinkError<T::Error>> {
        let bytes = message.encode();
        #[cfg(feature = "defmt")]
        defmt::trace!("TX {} -> {=[u8]:#x}", message, &bytes[..]);
        self.tx.write_blocking(&bytes).map_err(LinkError::Transport)
    }

    /// Set the mode of a pin
    ///
    /// Sent as three raw bytes, so `pin` must fit in 7 bits.
    pub fn pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), LinkError<T::Error>> {
        if pin > DATA_MASK {
            return Err(PinError::NotSevenBit(pin).into());
        }
        self.send(&Message::SetPinMode { pin, mode })
    }

    /// Drive one digital pin, resending the rest of its port unchanged
    pub fn digital_write(&mut self, pin: u8, high: bool) -> Result<(), LinkError<T::Error>> {
        let port = pin >> 3;
        let pins = self.layout.digital_pins();
        let value = {
            let slot = self
                .outputs
                .get_mut(usize::from(port))
                .ok_or(PinError::PinOutOfRange { pin, pins })?;
            let mask = 1u8 << (pin % PINS_PER_PORT);
            if high {
                *slot |= mask;
            } else {
                *slot &= !mask;
            }
            *slot
        };

        self.send(&Message::DigitalPort { port, value })
    }

    /// Write a PWM duty cycle to a pin
    ///
    /// The pin is switched to PWM mode first.
    pub fn analog_write(&mut self, pin: u8, value: u8) -> Result<(), LinkError<T::Error>> {
        self.pin_mode(pin, PinMode::Pwm)?;
        self.send(&Message::AnalogWrite {
            pin,
            value: u16::from(value),
        })
    }

    /// Enable or disable reporting of one analog channel
    pub fn report_analog(&mut self, channel: u8, enable: bool) -> Result<(), LinkError<T::Error>> {
        let channels = self.layout.analog_channels();
        if channel >= channels {
            return Err(PinError::ChannelOutOfRange { channel, channels }.into());
        }
        self.send(&Message::ReportAnalog { channel, enable })
    }

    /// Enable or disable reporting of one digital port
    pub fn report_digital(&mut self, port: u8, enable: bool) -> Result<(), LinkError<T::Error>> {
        let ports = self.layout.digital_ports();
        if port >= ports {
            return Err(PinError::PortOutOfRange { port, ports }.into());
        }
        self.send(&Message::ReportDigital { port, enable })
    }

    /// Switch on reporting for the channels and ports in the layout
    ///
    /// Analog channels first, then digital ports.
    pub fn request_reports(&mut self) -> Result<(), LinkError<T::Error>> {
        for channel in 0..self.layout.reported_analog_channels() {
            self.report_analog(channel, true)?;
        }
        for port in 0..self.layout.reported_digital_ports() {
            self.report_digital(port, true)?;
        }
        Ok(())
    }

    /// Ask the board to report its firmware version
    pub fn request_version(&mut self) -> Result<(), LinkError<T::Error>> {
        self.send(&Message::ReportVersion)
    }

    /// Reset the board
    ///
    /// The output mirror is cleared as well, matching the board's outputs
    /// coming back up low.
    pub fn system_reset(&mut self) -> Result<(), LinkError<T::Error>> {
        self.send(&Message::SystemReset)?;
        self.outputs.iter_mut().for_each(|port| *port = 0);
        Ok(())
    }

    /// Flush the transport
    pub fn flush(&mut self) -> Result<(), LinkError<T::Error>> {
        self.tx.flush().map_err(LinkError::Transport)
    }
}

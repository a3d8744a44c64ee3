//! Remote pin capabilities
//!
//! A remote board is driven entirely through these traits. Reads return the
//! last value the board reported, writes are sent over the link.

/// Operating mode of a remote pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Digital input
    Input,
    /// Digital output
    Output,
    /// Analog input
    Analog,
    /// PWM output
    Pwm,
    /// Servo output
    Servo,
}

/// Select the mode of a remote pin
pub trait PinModeControl {
    /// Error type for mode changes
    type Error;

    /// Put `pin` into `mode`
    fn set_pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), Self::Error>;
}

/// Digital I/O on a remote board
pub trait DigitalPins {
    /// Error type for digital operations
    type Error;

    /// Last known level of a digital pin
    fn digital_read(&self, pin: u8) -> Result<bool, Self::Error>;

    /// Drive a digital output pin
    fn digital_write(&mut self, pin: u8, high: bool) -> Result<(), Self::Error>;

    /// Check if the pin last read high
    fn is_high(&self, pin: u8) -> Result<bool, Self::Error> {
        self.digital_read(pin)
    }

    /// Check if the pin last read low
    fn is_low(&self, pin: u8) -> Result<bool, Self::Error> {
        self.digital_read(pin).map(|high| !high)
    }
}

/// Analog I/O on a remote board
pub trait AnalogPins {
    /// Error type for analog operations
    type Error;

    /// Last known value of an analog input channel (0-1023)
    fn analog_read(&self, channel: u8) -> Result<u16, Self::Error>;

    /// Write a PWM duty cycle (0 = always off, 255 = always on)
    fn analog_write(&mut self, pin: u8, duty: u8) -> Result<(), Self::Error>;
}

/// Full capability set of a remote board
pub trait RemoteBoard: PinModeControl + DigitalPins + AnalogPins {}

// Blanket implementation for types that implement all capabilities
impl<T: PinModeControl + DigitalPins + AnalogPins> RemoteBoard for T {}

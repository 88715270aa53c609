use num_enum::{IntoPrimitive, TryFromPrimitive};

// Error type.

/// Error type for the crate, which can represent either an error from this driver or an inner error
/// that comes from the I2C type.
///
/// Every variant except [`Error::I2CError`] is raised before the bus is touched.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<InnerError> {
    /// The I2C address is outside of the range the MCP4728 can be configured for (0x60-0x67).
    InvalidAddress(u8),
    /// A channel ordinal outside of 0-3 was given.
    InvalidChannel,
    /// A value was larger than the DAC supports.
    ///
    /// The MCP4728 is a 12-bit DAC, so values that it writes must be smaller than 2^12.
    ValueOutOfBounds(u16),
    /// A voltage could not be converted to a raw value, either because the supply voltage is not a
    /// positive number or because the requested voltage is outside of `0..=vdd`.
    VoltageOutOfRange,
    /// Error representing an error that came from the inner I2C driver.
    I2CError(InnerError),
}

impl<InnerError> Error<InnerError> {
    /// Returns true if the error was caused by an argument supplied by the caller rather than by
    /// the bus.
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, Error::I2CError(_))
    }
}

impl<InnerError> From<InnerError> for Error<InnerError> {
    fn from(inner: InnerError) -> Self {
        Error::I2CError(inner)
    }
}

// Enums for configuration.

/// Output channel selection.
///
/// Raw ordinals can be converted with `Channel::try_from(u8)`; anything above 3 is rejected.
#[derive(IntoPrimitive, TryFromPrimitive, Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Channel {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
}

/// Which copy of the DAC registers a command addresses.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Target {
    /// The live DAC input register. Takes effect immediately and is lost on power down.
    Volatile,
    /// The persisted EEPROM slot, loaded into the DAC on power up.
    ///
    /// Writes to the EEPROM are asynchronous: the device reports itself busy until the write
    /// completes, see [`MCP4728::eeprom_busy`](crate::MCP4728::eeprom_busy).
    Eeprom,
}

/// Configuration bits for the powered-down state of a channel.
#[derive(IntoPrimitive, TryFromPrimitive, Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PowerDownMode {
    /// Channel is not powered down.
    Normal = 0,
    /// Channel is powered down and output pin is connected to ground through a 1K resistor.
    PowerDownOneK = 1,
    /// Channel is powered down and output pin is connected to ground through a 100K resistor.
    PowerDownOneHundredK = 2,
    /// Channel is powered down and output pin is connected to ground through a 500K resistor.
    PowerDownFiveHundredK = 3,
}

impl PowerDownMode {
    /// Maps the two lowest bits of `bits` onto a mode. Higher bits are ignored.
    pub(crate) fn from_bits(bits: u8) -> PowerDownMode {
        match bits & 0b11 {
            0 => PowerDownMode::Normal,
            1 => PowerDownMode::PowerDownOneK,
            2 => PowerDownMode::PowerDownOneHundredK,
            _ => PowerDownMode::PowerDownFiveHundredK,
        }
    }
}

// Enums for status from reads.

/// Status of the EEPROM, reported in bit 7 of every status byte.
#[derive(IntoPrimitive, TryFromPrimitive, Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ReadyState {
    /// The EEPROM is busy.
    ///
    /// Any additional writes to the EEPROM should wait until the device is ready again.
    Busy = 0,
    /// The EEPROM is not busy.
    Ready = 1,
}

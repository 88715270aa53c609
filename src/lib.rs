//! # Rust register codec for the MCP4728 4-channel 12-bit I2C DAC
//!
//! This is a platform agnostic rust driver for the MCP4728 DAC using the [embedded-hal](https://github.com/rust-embedded/embedded-hal) traits.
//!
//! Every command is addressed at either the live DAC register ([`Target::Volatile`]) or the
//! persisted EEPROM copy ([`Target::Eeprom`]). EEPROM writes complete asynchronously on the
//! device; poll [`MCP4728::eeprom_busy`] with whatever delay and timeout suits your application
//! before issuing the next EEPROM write.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(target_os = "linux")] {
//! use linux_embedded_hal::I2cdev;
//! use mcp4728_codec::{MCP4728, PowerDownMode, Target};
//!
//! let i2c = I2cdev::new("/dev/i2c-1").unwrap();
//! let mut dac = MCP4728::new(i2c, 0x60).unwrap();
//! if dac.read_power_down_mode(Target::Eeprom).unwrap() != PowerDownMode::Normal {
//!     dac.write_power_down_mode(Target::Eeprom, PowerDownMode::Normal).unwrap();
//!     while dac.eeprom_busy().unwrap() {}
//! }
//! dac.write_voltage(3.3, 1.2, Target::Volatile).unwrap();
//! # }
//! ```
#![cfg_attr(not(test), no_std)]

#[cfg(any(feature = "async", test))]
mod async_impl;
mod encoding;
mod types;
mod voltage;

pub use crate::encoding::{ADDRESS_MAX, ADDRESS_MIN, MAX_VALUE};
pub use crate::types::*;
pub use crate::voltage::{raw_to_voltage, voltage_to_raw};

#[cfg(any(feature = "sync", test))]
use crate::encoding::*;
#[cfg(any(feature = "sync", test))]
use embedded_hal::i2c;

/// MCP4728 4-channel 12-bit I2C DAC.
///
/// The driver keeps no state besides the bus and the device address; every operation borrows it
/// mutably, so a read-modify-write such as [`MCP4728::write_power_down_mode`] cannot be interleaved
/// with another command issued through the same driver.
#[derive(Debug)]
pub struct MCP4728<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> MCP4728<I2C> {
    /// The 7-bit I2C address of the device.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Destroy this instance and return the inner I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

/// Implementation of all commands given a blocking I2C bus.
///
/// # Errors
///
/// Any errors encountered within the I2C device will be wrapped in [`Error::I2CError`]. Invalid
/// arguments are reported before anything is sent on the bus.
#[cfg(any(feature = "sync", test))]
impl<I2C, E> MCP4728<I2C>
where
    I2C: i2c::I2c<Error = E>,
{
    /// Creates a new [`MCP4728`] from an I2C device that implements the
    /// [`embedded_hal::i2c::I2c`] trait.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if `address` is outside of `0x60..=0x67`.
    pub fn new(i2c: I2C, address: u8) -> Result<Self, Error<E>> {
        let address = check_address::<E>(address)?;
        Ok(MCP4728 { i2c, address })
    }

    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<(), Error<E>> {
        self.i2c.read(self.address, bytes).map_err(Error::I2CError)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("mcp4728 {=u8:#x} <- {=[u8]:#x}", self.address, bytes);
        self.i2c.write(self.address, bytes).map_err(Error::I2CError)
    }

    /// Reads the EEPROM ready bit from the status byte.
    pub fn read_ready_state(&mut self) -> Result<ReadyState, Error<E>> {
        let mut bytes = [0; STATUS_READ_LEN];
        self.read_bytes(&mut bytes)?;
        Ok(decode_ready_state(bytes[0]))
    }

    /// Returns true while the device is still committing a previous EEPROM write.
    ///
    /// This is the only way to observe the end of an EEPROM write. The driver never waits on its
    /// own, so callers poll this with their own delay and timeout policy.
    pub fn eeprom_busy(&mut self) -> Result<bool, Error<E>> {
        Ok(self.read_ready_state()? == ReadyState::Busy)
    }

    /// Reads the power down mode of either the DAC register or the EEPROM.
    pub fn read_power_down_mode(&mut self, target: Target) -> Result<PowerDownMode, Error<E>> {
        let mut bytes = [0; MAX_READ_LEN];
        let bytes = &mut bytes[..target.power_down_mode_read_len()];
        self.read_bytes(bytes)?;
        Ok(decode_power_down_mode(target, bytes))
    }

    /// Sets the power down mode of either the DAC register or the EEPROM.
    ///
    /// The power down command also carries the output value, so the current value of `target` is
    /// read first and sent back unchanged.
    pub fn write_power_down_mode(
        &mut self,
        target: Target,
        mode: PowerDownMode,
    ) -> Result<(), Error<E>> {
        let value = self.read_raw_output(target)?;
        self.write_bytes(&encode_power_down_mode(mode, value))
    }

    /// Reads the raw 12-bit output value of either the DAC register or the EEPROM.
    pub fn read_raw_output(&mut self, target: Target) -> Result<u16, Error<E>> {
        let mut bytes = [0; MAX_READ_LEN];
        let bytes = &mut bytes[..target.raw_output_read_len()];
        self.read_bytes(bytes)?;
        Ok(decode_raw_output(target, bytes))
    }

    /// Writes a raw 12-bit output value to either the DAC register or the EEPROM.
    ///
    /// The DAC register is written with the fast write command, the EEPROM with the sequential
    /// write command. After an EEPROM write the device stays busy for a while, see
    /// [`MCP4728::eeprom_busy`].
    ///
    /// # Errors
    ///
    /// In addition to the internal I2C errors, this can return [`Error::ValueOutOfBounds`] if the
    /// value is out of range (greater than 4095).
    pub fn write_raw_output(&mut self, value: u16, target: Target) -> Result<(), Error<E>> {
        let value = check_value::<E>(value)?;
        self.write_bytes(&encode_raw_output(target, value))
    }

    /// Updates the DAC register with the compact two byte fast write frame.
    ///
    /// The EEPROM is not affected.
    ///
    /// # Errors
    ///
    /// In addition to the internal I2C errors, this can return [`Error::ValueOutOfBounds`] if the
    /// value is out of range (greater than 4095).
    pub fn fast_write(&mut self, value: u16) -> Result<(), Error<E>> {
        let value = check_value::<E>(value)?;
        self.write_bytes(&encode_fast_write(value))
    }

    /// Writes a raw value to a single channel and applies it immediately.
    ///
    /// `channel` is either a [`Channel`] or its ordinal as a `u8`.
    ///
    /// # Errors
    ///
    /// In addition to the internal I2C errors, this can return [`Error::InvalidChannel`] if the
    /// ordinal is greater than 3 and [`Error::ValueOutOfBounds`] if the value is out of range
    /// (greater than 4095).
    pub fn write_channel_raw<C>(&mut self, channel: C, value: u16) -> Result<(), Error<E>>
    where
        C: TryInto<Channel>,
    {
        let channel = check_channel::<_, E>(channel)?;
        let value = check_value::<E>(value)?;
        self.write_bytes(&encode_channel_write(channel, value))
    }

    /// Reads the output value of `target` and converts it to volts for supply voltage `vdd`.
    pub fn read_voltage(&mut self, vdd: f32, target: Target) -> Result<f32, Error<E>> {
        Ok(raw_to_voltage(self.read_raw_output(target)?, vdd))
    }

    /// Converts `volts` to a raw value for supply voltage `vdd` and writes it to `target`.
    ///
    /// # Errors
    ///
    /// In addition to the internal I2C errors, this can return [`Error::VoltageOutOfRange`] if the
    /// voltage cannot be represented, see [`voltage_to_raw`].
    pub fn write_voltage(&mut self, vdd: f32, volts: f32, target: Target) -> Result<(), Error<E>> {
        let value = voltage_to_raw(volts, vdd).ok_or(Error::VoltageOutOfRange)?;
        self.write_raw_output(value, target)
    }
}

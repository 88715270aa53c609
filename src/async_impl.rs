use crate::encoding::*;
use crate::types::*;
use crate::voltage::{raw_to_voltage, voltage_to_raw};
use crate::MCP4728;

use embedded_hal_async::i2c;

/// Implementation of all commands given an async I2C bus.
///
/// Each method mirrors its blocking counterpart with an `_async` suffix and issues exactly the
/// same frames.
///
/// # Errors
///
/// Any errors encountered within the I2C device will be wrapped in [`Error::I2CError`].
impl<I, E> MCP4728<I>
where
    I: i2c::I2c<Error = E>,
{
    /// Creates a new [`MCP4728`] from an I2C device that implements the
    /// [`embedded_hal_async::i2c::I2c`] trait.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if `address` is outside of `0x60..=0x67`.
    pub fn new_async(i2c: I, address: u8) -> Result<Self, Error<E>> {
        let address = check_address::<E>(address)?;
        Ok(MCP4728 { i2c, address })
    }

    async fn read_bytes_async(&mut self, bytes: &mut [u8]) -> Result<(), Error<E>> {
        self.i2c
            .read(self.address, bytes)
            .await
            .map_err(Error::I2CError)
    }

    async fn write_bytes_async(&mut self, bytes: &[u8]) -> Result<(), Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("mcp4728 {=u8:#x} <- {=[u8]:#x}", self.address, bytes);
        self.i2c
            .write(self.address, bytes)
            .await
            .map_err(Error::I2CError)
    }

    /// Reads the EEPROM ready bit from the status byte.
    pub async fn read_ready_state_async(&mut self) -> Result<ReadyState, Error<E>> {
        let mut bytes = [0; STATUS_READ_LEN];
        self.read_bytes_async(&mut bytes).await?;
        Ok(decode_ready_state(bytes[0]))
    }

    /// Returns true while the device is still committing a previous EEPROM write.
    pub async fn eeprom_busy_async(&mut self) -> Result<bool, Error<E>> {
        Ok(self.read_ready_state_async().await? == ReadyState::Busy)
    }

    /// Reads the power down mode of either the DAC register or the EEPROM.
    pub async fn read_power_down_mode_async(
        &mut self,
        target: Target,
    ) -> Result<PowerDownMode, Error<E>> {
        let mut bytes = [0; MAX_READ_LEN];
        let bytes = &mut bytes[..target.power_down_mode_read_len()];
        self.read_bytes_async(bytes).await?;
        Ok(decode_power_down_mode(target, bytes))
    }

    /// Sets the power down mode of either the DAC register or the EEPROM, re-sending the current
    /// value of `target`.
    pub async fn write_power_down_mode_async(
        &mut self,
        target: Target,
        mode: PowerDownMode,
    ) -> Result<(), Error<E>> {
        let value = self.read_raw_output_async(target).await?;
        self.write_bytes_async(&encode_power_down_mode(mode, value))
            .await
    }

    /// Reads the raw 12-bit output value of either the DAC register or the EEPROM.
    pub async fn read_raw_output_async(&mut self, target: Target) -> Result<u16, Error<E>> {
        let mut bytes = [0; MAX_READ_LEN];
        let bytes = &mut bytes[..target.raw_output_read_len()];
        self.read_bytes_async(bytes).await?;
        Ok(decode_raw_output(target, bytes))
    }

    /// Writes a raw 12-bit output value to either the DAC register or the EEPROM.
    pub async fn write_raw_output_async(
        &mut self,
        value: u16,
        target: Target,
    ) -> Result<(), Error<E>> {
        let value = check_value::<E>(value)?;
        self.write_bytes_async(&encode_raw_output(target, value))
            .await
    }

    /// Updates the DAC register with the compact two byte fast write frame.
    pub async fn fast_write_async(&mut self, value: u16) -> Result<(), Error<E>> {
        let value = check_value::<E>(value)?;
        self.write_bytes_async(&encode_fast_write(value)).await
    }

    /// Writes a raw value to a single channel and applies it immediately.
    pub async fn write_channel_raw_async<C>(
        &mut self,
        channel: C,
        value: u16,
    ) -> Result<(), Error<E>>
    where
        C: TryInto<Channel>,
    {
        let channel = check_channel::<_, E>(channel)?;
        let value = check_value::<E>(value)?;
        self.write_bytes_async(&encode_channel_write(channel, value))
            .await
    }

    pub async fn read_voltage_async(&mut self, vdd: f32, target: Target) -> Result<f32, Error<E>> {
        Ok(raw_to_voltage(self.read_raw_output_async(target).await?, vdd))
    }

    pub async fn write_voltage_async(
        &mut self,
        vdd: f32,
        volts: f32,
        target: Target,
    ) -> Result<(), Error<E>> {
        let value = voltage_to_raw(volts, vdd).ok_or(Error::VoltageOutOfRange)?;
        self.write_raw_output_async(value, target).await
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    #[tokio::test]
    async fn eeprom_busy_until_ready_bit_set() {
        let expectations = [
            I2cTransaction::read(0x62, vec![0x00]),
            I2cTransaction::read(0x62, vec![0x00]),
            I2cTransaction::read(0x62, vec![0x80]),
        ];
        let i2c = I2cMock::new(&expectations);
        let mut dac = MCP4728::new_async(i2c, 0x62).unwrap();
        assert_eq!(dac.eeprom_busy_async().await, Ok(true));
        assert_eq!(dac.eeprom_busy_async().await, Ok(true));
        assert_eq!(dac.read_ready_state_async().await, Ok(ReadyState::Ready));
        dac.release().done();
    }

    #[tokio::test]
    async fn eeprom_round_trip_of_power_down_mode() {
        let expectations = [
            I2cTransaction::read(0x60, vec![0x00, 0x00, 0x00, 0x60]),
            I2cTransaction::read(0x60, vec![0x00, 0x00, 0x00, 0x6f, 0xff]),
            I2cTransaction::write(0x60, vec![0xa0, 0xff, 0xf0]),
        ];
        let i2c = I2cMock::new(&expectations);
        let mut dac = MCP4728::new_async(i2c, 0x60).unwrap();
        assert_eq!(
            dac.read_power_down_mode_async(Target::Eeprom).await,
            Ok(PowerDownMode::PowerDownFiveHundredK)
        );
        assert_eq!(
            dac.write_power_down_mode_async(Target::Eeprom, PowerDownMode::Normal)
                .await,
            Ok(())
        );
        dac.release().done();
    }

    #[tokio::test]
    async fn volatile_reads() {
        let expectations = [
            I2cTransaction::read(0x60, vec![0b0000_0010]),
            I2cTransaction::read(0x60, vec![0x80, 0x00, 0x00]),
        ];
        let i2c = I2cMock::new(&expectations);
        let mut dac = MCP4728::new_async(i2c, 0x60).unwrap();
        assert_eq!(
            dac.read_power_down_mode_async(Target::Volatile).await,
            Ok(PowerDownMode::PowerDownOneK)
        );
        assert_eq!(dac.read_raw_output_async(Target::Volatile).await, Ok(0x0800));
        dac.release().done();
    }

    #[tokio::test]
    async fn writes() {
        let expectations = [
            I2cTransaction::write(0x60, vec![0x00, 0xff, 0xf0]),
            I2cTransaction::write(0x60, vec![0x50, 0x80, 0x00]),
            I2cTransaction::write(0x60, vec![0x08, 0x00]),
            I2cTransaction::write(0x60, vec![0x5a, 0x18, 0x00]),
            I2cTransaction::write(0x60, vec![0x00, 0x7d, 0x00]),
        ];
        let i2c = I2cMock::new(&expectations);
        let mut dac = MCP4728::new_async(i2c, 0x60).unwrap();
        assert_eq!(
            dac.write_raw_output_async(0x0fff, Target::Volatile).await,
            Ok(())
        );
        assert_eq!(
            dac.write_raw_output_async(0x0800, Target::Eeprom).await,
            Ok(())
        );
        assert_eq!(dac.fast_write_async(0x0800).await, Ok(()));
        assert_eq!(
            dac.write_channel_raw_async(Channel::B, 0x0800).await,
            Ok(())
        );
        assert_eq!(
            dac.write_voltage_async(4.095, 2.0, Target::Volatile).await,
            Ok(())
        );
        dac.release().done();
    }

    #[tokio::test]
    async fn invalid_arguments_never_reach_the_bus() {
        let i2c = I2cMock::new(&[]);
        let mut dac = MCP4728::new_async(i2c, 0x60).unwrap();
        assert_eq!(
            dac.write_channel_raw_async(5u8, 0).await,
            Err(Error::InvalidChannel)
        );
        assert_eq!(
            dac.fast_write_async(0x1000).await,
            Err(Error::ValueOutOfBounds(0x1000))
        );
        assert_eq!(
            dac.write_voltage_async(3.3, -1.0, Target::Eeprom).await,
            Err(Error::VoltageOutOfRange)
        );
        dac.release().done();
    }

    #[tokio::test]
    async fn i2c_errors_are_wrapped() {
        let expectations = [
            I2cTransaction::read(0x60, vec![0x00, 0x00, 0x00]).with_error(ErrorKind::Other),
            I2cTransaction::write(0x60, vec![0x0f, 0xff]).with_error(ErrorKind::Other),
        ];
        let i2c = I2cMock::new(&expectations);
        let mut dac = MCP4728::new_async(i2c, 0x60).unwrap();
        assert_eq!(
            dac.write_power_down_mode_async(Target::Volatile, PowerDownMode::Normal)
                .await,
            Err(Error::I2CError(ErrorKind::Other))
        );
        assert_eq!(
            dac.fast_write_async(0x0fff).await,
            Err(Error::I2CError(ErrorKind::Other))
        );
        dac.release().done();
    }
}

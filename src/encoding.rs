//! Frame layouts of the MCP4728 command set.
//!
//! Everything here is pure: the blocking and async drivers build their frames with these functions
//! and hand the bytes to the bus unchanged.

use crate::types::*;

pub(crate) const COMMAND_FAST_WRITE: u8 = 0b00000000;
pub(crate) const COMMAND_SEQUENTIAL_WRITE: u8 = 0b01010000;
pub(crate) const COMMAND_SINGLE_WRITE: u8 = 0b01011000;
pub(crate) const COMMAND_WRITE_POWER_DOWN_MODE: u8 = 0b10100000;

/// Set in byte 1 of a single write to apply the value immediately.
pub(crate) const UPLOAD_FLAG: u8 = 0b00010000;
/// Set in a status byte when the EEPROM is not busy.
pub(crate) const READY_BIT: u8 = 0b10000000;

/// Largest raw value the 12-bit DAC accepts.
pub const MAX_VALUE: u16 = 0x0fff;

/// Lowest configurable I2C address.
pub const ADDRESS_MIN: u8 = 0x60;
/// Highest configurable I2C address.
pub const ADDRESS_MAX: u8 = 0x67;

/// Longest frame any read issues.
pub(crate) const MAX_READ_LEN: usize = 5;
pub(crate) const STATUS_READ_LEN: usize = 1;

impl Target {
    /// Number of bytes to read to reach the power down bits of this target.
    pub(crate) const fn power_down_mode_read_len(self) -> usize {
        match self {
            Target::Volatile => 1,
            Target::Eeprom => 4,
        }
    }

    /// Number of bytes to read to reach the value bits of this target.
    pub(crate) const fn raw_output_read_len(self) -> usize {
        match self {
            Target::Volatile => 3,
            Target::Eeprom => 5,
        }
    }

    /// Opcode used by [`encode_raw_output`].
    pub(crate) const fn raw_output_command(self) -> u8 {
        match self {
            Target::Volatile => COMMAND_FAST_WRITE,
            Target::Eeprom => COMMAND_SEQUENTIAL_WRITE,
        }
    }
}

pub(crate) fn check_value<E>(value: u16) -> Result<u16, Error<E>> {
    if value > MAX_VALUE {
        #[cfg(feature = "defmt")]
        defmt::warn!("rejected out of range value {=u16:#x}", value);
        return Err(Error::ValueOutOfBounds(value));
    }
    Ok(value)
}

pub(crate) fn check_address<E>(address: u8) -> Result<u8, Error<E>> {
    if !(ADDRESS_MIN..=ADDRESS_MAX).contains(&address) {
        #[cfg(feature = "defmt")]
        defmt::warn!("invalid device address {=u8:#x}", address);
        return Err(Error::InvalidAddress(address));
    }
    Ok(address)
}

pub(crate) fn check_channel<C, E>(channel: C) -> Result<Channel, Error<E>>
where
    C: TryInto<Channel>,
{
    channel.try_into().map_err(|_| {
        #[cfg(feature = "defmt")]
        defmt::warn!("invalid channel");
        Error::InvalidChannel
    })
}

// Value packed as || D11..D4 || D3..D0 0 0 0 0 ||, shared by the raw output and power down writes.
fn packed_value(value: u16) -> [u8; 2] {
    [(value >> 4) as u8, (value << 4) as u8]
}

/// || 0 0 0 0 D11 D10 D9 D8 || D7 .. D0 ||
pub(crate) fn encode_fast_write(value: u16) -> [u8; 2] {
    [(value >> 8) as u8 & 0x0f, value as u8]
}

/// || CMD || D11..D4 || D3..D0 0 0 0 0 ||
pub(crate) fn encode_raw_output(target: Target, value: u16) -> [u8; 3] {
    let [high, low] = packed_value(value);
    [target.raw_output_command(), high, low]
}

/// || 0 1 0 1 1 CH CH 0 || 0 0 0 U D11 D10 D9 D8 || D7 .. D0 ||
pub(crate) fn encode_channel_write(channel: Channel, value: u16) -> [u8; 3] {
    [
        COMMAND_SINGLE_WRITE | (channel as u8) << 1,
        UPLOAD_FLAG | (value >> 8) as u8 & 0x0f,
        value as u8,
    ]
}

/// || 1 0 1 0 0 PD PD 0 || D11..D4 || D3..D0 0 0 0 0 ||
pub(crate) fn encode_power_down_mode(mode: PowerDownMode, value: u16) -> [u8; 3] {
    let [high, low] = packed_value(value);
    [COMMAND_WRITE_POWER_DOWN_MODE | (mode as u8) << 1, high, low]
}

pub(crate) fn decode_ready_state(status: u8) -> ReadyState {
    if status & READY_BIT != 0 {
        ReadyState::Ready
    } else {
        ReadyState::Busy
    }
}

/// `bytes` must hold at least [`Target::power_down_mode_read_len`] bytes.
pub(crate) fn decode_power_down_mode(target: Target, bytes: &[u8]) -> PowerDownMode {
    match target {
        Target::Volatile => PowerDownMode::from_bits(bytes[0] >> 1),
        Target::Eeprom => PowerDownMode::from_bits(bytes[3] >> 5),
    }
}

/// `bytes` must hold at least [`Target::raw_output_read_len`] bytes.
pub(crate) fn decode_raw_output(target: Target, bytes: &[u8]) -> u16 {
    match target {
        Target::Volatile => u16::from(bytes[0]) << 4 | u16::from(bytes[1] >> 4),
        Target::Eeprom => u16::from_be_bytes([bytes[3] & 0x0f, bytes[4]]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type E = Error<()>;

    #[test]
    fn fast_write_frame() {
        assert_eq!(encode_fast_write(0x0abc), [0x0a, 0xbc]);
        assert_eq!(encode_fast_write(0x0fff), [0x0f, 0xff]);
        assert_eq!(encode_fast_write(0), [0x00, 0x00]);
    }

    #[test]
    fn raw_output_frame_depends_on_target() {
        assert_eq!(
            encode_raw_output(Target::Volatile, 0x0fff),
            [0x00, 0xff, 0xf0]
        );
        assert_eq!(
            encode_raw_output(Target::Eeprom, 0x0abc),
            [0x50, 0xab, 0xc0]
        );
    }

    #[test]
    fn channel_write_frame_sets_upload_flag() {
        assert_eq!(
            encode_channel_write(Channel::A, 0x0800),
            [0x58, 0x18, 0x00]
        );
        assert_eq!(
            encode_channel_write(Channel::D, 0x0123),
            [0b01011110, 0x11, 0x23]
        );
    }

    #[test]
    fn power_down_frame_resends_value() {
        assert_eq!(
            encode_power_down_mode(PowerDownMode::Normal, 0x0123),
            [0xa0, 0x12, 0x30]
        );
        assert_eq!(
            encode_power_down_mode(PowerDownMode::PowerDownFiveHundredK, 0x0fff),
            [0b10100110, 0xff, 0xf0]
        );
    }

    #[test]
    fn ready_bit() {
        assert_eq!(decode_ready_state(0x80), ReadyState::Ready);
        assert_eq!(decode_ready_state(0xff), ReadyState::Ready);
        assert_eq!(decode_ready_state(0x00), ReadyState::Busy);
        assert_eq!(decode_ready_state(0x7f), ReadyState::Busy);
    }

    #[test]
    fn volatile_power_down_mode_uses_bits_2_and_1() {
        assert_eq!(
            decode_power_down_mode(Target::Volatile, &[0b0000_0110]),
            PowerDownMode::PowerDownFiveHundredK
        );
        assert_eq!(
            decode_power_down_mode(Target::Volatile, &[0b1111_1001]),
            PowerDownMode::Normal
        );
        assert_eq!(
            decode_power_down_mode(Target::Volatile, &[0b0000_0010]),
            PowerDownMode::PowerDownOneK
        );
    }

    #[test]
    fn eeprom_power_down_mode_uses_bits_6_and_5_of_byte_3() {
        // 0x60 = 0b0110_0000, bits [6:5] = 0b11.
        assert_eq!(
            decode_power_down_mode(Target::Eeprom, &[0, 0, 0, 0x60]),
            PowerDownMode::PowerDownFiveHundredK
        );
        assert_eq!(
            decode_power_down_mode(Target::Eeprom, &[0xff, 0xff, 0xff, 0b1100_0000]),
            PowerDownMode::PowerDownOneHundredK
        );
        assert_eq!(
            decode_power_down_mode(Target::Eeprom, &[0, 0, 0, 0b1001_1111]),
            PowerDownMode::Normal
        );
    }

    #[test]
    fn raw_output_decoding() {
        assert_eq!(
            decode_raw_output(Target::Volatile, &[0xab, 0xc7, 0x00]),
            0x0abc
        );
        assert_eq!(
            decode_raw_output(Target::Eeprom, &[0, 0, 0, 0x0a, 0xbc]),
            0x0abc
        );
        assert_eq!(
            decode_raw_output(Target::Eeprom, &[0xff, 0xff, 0xff, 0xf5, 0x55]),
            0x0555
        );
    }

    #[test]
    fn argument_checks() {
        assert_eq!(check_value::<()>(0x0fff), Ok(0x0fff));
        assert_eq!(check_value::<()>(0x1000), Err(E::ValueOutOfBounds(0x1000)));
        assert_eq!(check_address::<()>(0x60), Ok(0x60));
        assert_eq!(check_address::<()>(0x67), Ok(0x67));
        assert_eq!(check_address::<()>(0x68), Err(E::InvalidAddress(0x68)));
        assert_eq!(check_address::<()>(0x5f), Err(E::InvalidAddress(0x5f)));
        assert_eq!(check_channel::<_, ()>(3u8), Ok(Channel::D));
        assert_eq!(check_channel::<_, ()>(Channel::B), Ok(Channel::B));
        assert_eq!(check_channel::<_, ()>(4u8), Err(E::InvalidChannel));
    }
}

//! Conversion between raw DAC codes and output voltages.
//!
//! The output is linear in the raw value: a code of [`MAX_VALUE`] drives the output to the supply
//! voltage `vdd`, which the caller supplies since the device has no way to report it.

use crate::encoding::MAX_VALUE;

const FULL_SCALE: f32 = MAX_VALUE as f32;

/// Converts a raw 12-bit code to the voltage it produces with supply voltage `vdd`.
pub fn raw_to_voltage(raw: u16, vdd: f32) -> f32 {
    vdd / FULL_SCALE * f32::from(raw)
}

/// Converts a voltage to the nearest raw 12-bit code for supply voltage `vdd`.
///
/// Returns `None` if `vdd` is not a positive, finite number or if `volts` rounds to a code outside
/// of `0..=4095`.
pub fn voltage_to_raw(volts: f32, vdd: f32) -> Option<u16> {
    if !(vdd.is_finite() && vdd > 0.0) {
        return None;
    }
    let raw = FULL_SCALE / vdd * volts;
    // Also rejects NaN.
    if !(-0.5..FULL_SCALE + 0.5).contains(&raw) {
        return None;
    }
    // `round` lives in std; adding one half before truncating is equivalent for raw >= -0.5.
    Some((raw + 0.5) as u16)
}

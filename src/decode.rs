/*
 * This file is part of smc-temp.
 *
 * Copyright (C) 2025 smc-temp contributors
 *
 * smc-temp is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * smc-temp is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with smc-temp. If not, see <https://www.gnu.org/licenses/>.
 */

//! Conversion of raw SMC values into temperatures and fan speeds.
//!
//! Every decoder comes in two flavours: one returning a `Result` so callers
//! can tell "decoded to zero" from "could not decode", and one returning the
//! sentinel the command line tool has always printed (`0.0` for
//! temperatures and fan speeds, `-1.0` for fan RPM).
//!
//! All bytes are read as unsigned. `ui16` and `ui32` are the literal sum of
//! their bytes, not a recombined integer.

use thiserror::Error;

use crate::key::DataType;
use crate::protocol::SmcVal;

pub const TEMPERATURE_SENTINEL: f64 = 0.0;
pub const FAN_SPEED_SENTINEL: f64 = 0.0;
pub const FAN_RPM_SENTINEL: f32 = -1.0;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("value is empty")]
    Empty,
    #[error("unsupported data type {0}")]
    Unsupported(DataType),
}

fn be16(b: &[u8]) -> u32 {
    u32::from(b[0]) * 256 + u32::from(b[1])
}

fn le_f32(b: &[u8]) -> f32 {
    f32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

fn non_empty(val: &SmcVal) -> Result<&[u8], DecodeError> {
    if val.data_size == 0 {
        return Err(DecodeError::Empty);
    }
    Ok(&val.bytes)
}

pub fn temperature(val: &SmcVal) -> Result<f64, DecodeError> {
    let b = non_empty(val)?;
    let fixed = |divisor: f64| f64::from(be16(b)) / divisor;
    let value = match val.data_type {
        DataType::UINT8 => f64::from(b[0]),
        DataType::UINT16 => f64::from(u32::from(b[0]) + u32::from(b[1])),
        DataType::UINT32 => f64::from(b[..4].iter().map(|&x| u32::from(x)).sum::<u32>()),
        DataType::SP1E => fixed(16384.0),
        DataType::SP3C => fixed(4096.0),
        DataType::SP4B => fixed(2048.0),
        DataType::SP5A => fixed(1024.0),
        DataType::SP69 => fixed(512.0),
        DataType::SP78 => fixed(256.0),
        DataType::SP87 => fixed(128.0),
        DataType::SP96 => fixed(64.0),
        DataType::SPB4 => fixed(16.0),
        DataType::SPF0 => fixed(1.0),
        DataType::FLT => f64::from(le_f32(b)),
        other => return Err(DecodeError::Unsupported(other)),
    };
    Ok(value)
}

/// Fan speed as the fan-speed keys report it. Note `flt` is read as a
/// quarter-RPM fixed-point here, unlike [`fan_rpm`].
pub fn fan_speed(val: &SmcVal) -> Result<f64, DecodeError> {
    let b = non_empty(val)?;
    match val.data_type {
        DataType::FLT | DataType::FPE2 => Ok(f64::from(be16(b)) / 4.0),
        other => Err(DecodeError::Unsupported(other)),
    }
}

pub fn fan_rpm(val: &SmcVal) -> Result<f32, DecodeError> {
    let b = non_empty(val)?;
    match val.data_type {
        DataType::FLT => Ok(le_f32(b)),
        DataType::FPE2 => Ok(f32::from(u16::from_be_bytes([b[0], b[1]])) / 4.0),
        other => Err(DecodeError::Unsupported(other)),
    }
}

pub fn temperature_or_zero(val: &SmcVal) -> f64 {
    temperature(val).unwrap_or(TEMPERATURE_SENTINEL)
}

pub fn fan_speed_or_zero(val: &SmcVal) -> f64 {
    fan_speed(val).unwrap_or(FAN_SPEED_SENTINEL)
}

pub fn fan_rpm_or_negative(val: &SmcVal) -> f32 {
    fan_rpm(val).unwrap_or(FAN_RPM_SENTINEL)
}

/// Unsigned big-endian integer over the first `data_size` bytes (at most 4).
pub fn unsigned(val: &SmcVal) -> u32 {
    val.payload().iter().take(4).fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::SmcKey;

    fn val(data_type: DataType, bytes: &[u8]) -> SmcVal {
        SmcVal::new(SmcKey::from_bytes(*b"TEST"), data_type, bytes)
    }

    #[test]
    fn test_sp78_temperature() {
        assert_eq!(temperature(&val(DataType::SP78, &[0x01, 0x40])), Ok(1.25));
        assert_eq!(temperature(&val(DataType::SP78, &[0x3c, 0x80])), Ok(60.5));
    }

    #[test]
    fn test_fixed_point_divisors() {
        let bytes = [0x40, 0x00]; // 16384
        assert_eq!(temperature(&val(DataType::SP1E, &bytes)), Ok(1.0));
        assert_eq!(temperature(&val(DataType::SP3C, &bytes)), Ok(4.0));
        assert_eq!(temperature(&val(DataType::SP4B, &bytes)), Ok(8.0));
        assert_eq!(temperature(&val(DataType::SP5A, &bytes)), Ok(16.0));
        assert_eq!(temperature(&val(DataType::SP69, &bytes)), Ok(32.0));
        assert_eq!(temperature(&val(DataType::SP87, &bytes)), Ok(128.0));
        assert_eq!(temperature(&val(DataType::SP96, &bytes)), Ok(256.0));
        assert_eq!(temperature(&val(DataType::SPB4, &bytes)), Ok(1024.0));
        assert_eq!(temperature(&val(DataType::SPF0, &bytes)), Ok(16384.0));
    }

    #[test]
    fn test_high_bytes_are_unsigned() {
        assert_eq!(temperature(&val(DataType::UINT8, &[200])), Ok(200.0));
        assert_eq!(temperature(&val(DataType::SP78, &[0xff, 0x00])), Ok(255.0));
        assert_eq!(temperature(&val(DataType::SPF0, &[0x80, 0x01])), Ok(32769.0));
    }

    #[test]
    fn test_integer_tags_sum_bytes() {
        assert_eq!(temperature(&val(DataType::UINT16, &[0x01, 0x02])), Ok(3.0));
        assert_eq!(temperature(&val(DataType::UINT32, &[1, 2, 3, 0xff])), Ok(261.0));
    }

    #[test]
    fn test_flt_temperature_is_little_endian_float() {
        assert_eq!(temperature(&val(DataType::FLT, &[0x00, 0x00, 0x80, 0x42])), Ok(64.0));
    }

    #[test]
    fn test_flt_fan_speed_is_fixed_point() {
        assert_eq!(fan_speed(&val(DataType::FLT, &[0x00, 0x00, 0x80, 0x42])), Ok(0.0));
        assert_eq!(fan_speed(&val(DataType::FLT, &[0x17, 0x70, 0, 0])), Ok(1500.0));
    }

    #[test]
    fn test_fpe2_fan_speed_and_rpm() {
        assert_eq!(fan_speed(&val(DataType::FPE2, &[0x02, 0x00])), Ok(128.0));
        assert_eq!(fan_rpm(&val(DataType::FPE2, &[0x02, 0x00])), Ok(128.0));
        assert_eq!(fan_rpm(&val(DataType::FPE2, &[0xff, 0xfc])), Ok(16383.0));
    }

    #[test]
    fn test_flt_rpm_is_float() {
        let rpm = 2317.5f32.to_le_bytes();
        assert_eq!(fan_rpm(&val(DataType::FLT, &rpm)), Ok(2317.5));
    }

    #[test]
    fn test_unknown_tag_yields_sentinels() {
        for bytes in [[0u8, 0], [0x12, 0x34], [0xff, 0xff]] {
            let v = val(DataType::CH8, &bytes);
            assert_eq!(temperature(&v), Err(DecodeError::Unsupported(DataType::CH8)));
            assert_eq!(temperature_or_zero(&v), 0.0);
            assert_eq!(fan_speed_or_zero(&v), 0.0);
            assert_eq!(fan_rpm_or_negative(&v), -1.0);
        }
    }

    #[test]
    fn test_path_specific_tags() {
        // fpe2 is a fan encoding only; integer tags are temperature only
        assert!(temperature(&val(DataType::FPE2, &[0x02, 0x00])).is_err());
        assert!(fan_speed(&val(DataType::SP78, &[0x02, 0x00])).is_err());
        assert!(fan_rpm(&val(DataType::UINT8, &[2])).is_err());
    }

    #[test]
    fn test_empty_value_yields_sentinels() {
        let mut v = val(DataType::SP78, &[0x3c, 0x80]);
        v.data_size = 0;
        assert_eq!(temperature(&v), Err(DecodeError::Empty));
        assert_eq!(temperature_or_zero(&v), 0.0);
        assert_eq!(fan_rpm_or_negative(&v), -1.0);
    }

    #[test]
    fn test_decoded_zero_is_distinguishable() {
        let v = val(DataType::SP78, &[0, 0]);
        assert_eq!(temperature(&v), Ok(0.0));
        assert_eq!(temperature_or_zero(&v), 0.0);
    }

    #[test]
    fn test_unsigned_value() {
        assert_eq!(unsigned(&val(DataType::UINT8, &[2])), 2);
        assert_eq!(unsigned(&val(DataType::UINT16, &[0x01, 0x02])), 0x0102);
        assert_eq!(unsigned(&val(DataType::UINT8, &[])), 0);
    }
}

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

//! Four-character codes used by the SMC: keys and data type tags.

use std::fmt;
use std::str::FromStr;

use crate::error::SmcError;

/// A 4-byte ASCII SMC key such as `TC0P`.
///
/// The byte form and the big-endian integer form are always derived from the
/// same four bytes, so they cannot disagree.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SmcKey([u8; 4]);

impl SmcKey {
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Unpack a key from its transport form.
    pub const fn from_u32(raw: u32) -> Self {
        Self(raw.to_be_bytes())
    }

    /// Pack the key as sent in the `key` field of a transaction.
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Fan keys follow the `F<i><suffix>` pattern. Only single-digit
    /// indices fit in four bytes.
    pub fn fan(index: usize, suffix: &str) -> Result<Self, SmcError> {
        format!("F{}{}", index, suffix).parse()
    }
}

impl FromStr for SmcKey {
    type Err = SmcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 4 || !bytes.iter().all(|b| b.is_ascii() && !b.is_ascii_control()) {
            return Err(SmcError::InvalidKey(s.to_string()));
        }
        Ok(Self([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

impl fmt::Display for SmcKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_four_cc(f, &self.0)
    }
}

/// A 4-byte type tag declaring the encoding of a key's value (`sp78`, `flt `...).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct DataType([u8; 4]);

impl DataType {
    pub const UINT8: DataType = DataType(*b"ui8 ");
    pub const UINT16: DataType = DataType(*b"ui16");
    pub const UINT32: DataType = DataType(*b"ui32");
    pub const SP1E: DataType = DataType(*b"sp1e");
    pub const SP3C: DataType = DataType(*b"sp3c");
    pub const SP4B: DataType = DataType(*b"sp4b");
    pub const SP5A: DataType = DataType(*b"sp5a");
    pub const SP69: DataType = DataType(*b"sp69");
    pub const SP78: DataType = DataType(*b"sp78");
    pub const SP87: DataType = DataType(*b"sp87");
    pub const SP96: DataType = DataType(*b"sp96");
    pub const SPB4: DataType = DataType(*b"spb4");
    pub const SPF0: DataType = DataType(*b"spf0");
    pub const FLT: DataType = DataType(*b"flt ");
    pub const FPE2: DataType = DataType(*b"fpe2");
    pub const CH8: DataType = DataType(*b"ch8*");
    pub const FDS: DataType = DataType(*b"{fds");

    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Unpack the numeric tag carried in a key-info response.
    pub const fn from_u32(raw: u32) -> Self {
        Self(raw.to_be_bytes())
    }

    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_four_cc(f, &self.0)
    }
}

fn write_four_cc(f: &mut fmt::Formatter<'_>, bytes: &[u8; 4]) -> fmt::Result {
    for &b in bytes {
        let c = if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' };
        write!(f, "{}", c)?;
    }
    Ok(())
}

/// Keys known to the tool. Intel-era names first, then Apple Silicon ones.
pub mod keys {
    use super::SmcKey;

    pub const CPU_TEMP: SmcKey = SmcKey::from_bytes(*b"TC0P");
    pub const CPU_CORE_TEMP: SmcKey = SmcKey::from_bytes(*b"TC1C");
    pub const GPU_TEMP: SmcKey = SmcKey::from_bytes(*b"TG0P");
    pub const FAN_COUNT: SmcKey = SmcKey::from_bytes(*b"FNum");
    pub const FAN0_RPM_CUR: SmcKey = SmcKey::from_bytes(*b"F0Ac");
    pub const FAN0_RPM_MIN: SmcKey = SmcKey::from_bytes(*b"F0Mn");
    pub const FAN0_RPM_MAX: SmcKey = SmcKey::from_bytes(*b"F0Mx");
    pub const FAN1_RPM_CUR: SmcKey = SmcKey::from_bytes(*b"F1Ac");
    pub const FAN1_RPM_MIN: SmcKey = SmcKey::from_bytes(*b"F1Mn");
    pub const FAN1_RPM_MAX: SmcKey = SmcKey::from_bytes(*b"F1Mx");
    pub const FAN0_TARGET: SmcKey = SmcKey::from_bytes(*b"F0Tg");
    pub const FAN0_ID: SmcKey = SmcKey::from_bytes(*b"F0ID");

    pub const BATTERY_1_TEMP: SmcKey = SmcKey::from_bytes(*b"TB1T");
    pub const BATTERY_2_TEMP: SmcKey = SmcKey::from_bytes(*b"TB2T");

    // M1 family (M1, Pro, Max, Ultra)
    pub const CPU_ECORE_1_TEMP_M1: SmcKey = SmcKey::from_bytes(*b"Tp09");
    pub const CPU_ECORE_2_TEMP_M1: SmcKey = SmcKey::from_bytes(*b"Tp0T");
    pub const CPU_PCORE_1_TEMP_M1: SmcKey = SmcKey::from_bytes(*b"Tp01");
    pub const CPU_PCORE_2_TEMP_M1: SmcKey = SmcKey::from_bytes(*b"Tp05");
    pub const CPU_PCORE_3_TEMP_M1: SmcKey = SmcKey::from_bytes(*b"Tp0D");
    pub const CPU_PCORE_4_TEMP_M1: SmcKey = SmcKey::from_bytes(*b"Tp0H");
    pub const CPU_PCORE_5_TEMP_M1: SmcKey = SmcKey::from_bytes(*b"Tp0L");
    pub const CPU_PCORE_6_TEMP_M1: SmcKey = SmcKey::from_bytes(*b"Tp0P");
    pub const CPU_PCORE_7_TEMP_M1: SmcKey = SmcKey::from_bytes(*b"Tp0X");
    pub const CPU_PCORE_8_TEMP_M1: SmcKey = SmcKey::from_bytes(*b"Tp0b");

    pub const GPU_1_TEMP_M1: SmcKey = SmcKey::from_bytes(*b"Tg05");
    pub const GPU_2_TEMP_M1: SmcKey = SmcKey::from_bytes(*b"Tg0D");
    pub const GPU_3_TEMP_M1: SmcKey = SmcKey::from_bytes(*b"Tg0L");
    pub const GPU_4_TEMP_M1: SmcKey = SmcKey::from_bytes(*b"Tg0T");

    /// Key read for `-c` unless configured otherwise.
    pub const DEFAULT_CPU: SmcKey = CPU_ECORE_1_TEMP_M1;
    /// Key read for `-g` unless configured otherwise.
    pub const DEFAULT_GPU: SmcKey = GPU_TEMP;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_packs_big_endian() {
        let key: SmcKey = "TC0P".parse().unwrap();
        assert_eq!(key.to_u32(), 0x5443_3050);
        assert_eq!(SmcKey::from_u32(0x5443_3050), key);
    }

    #[test]
    fn test_key_round_trip_all_known_keys() {
        for name in ["TC0P", "TG0P", "FNum", "F0ID", "Tp09", "Tg0T", "TB1T"] {
            let key: SmcKey = name.parse().unwrap();
            assert_eq!(SmcKey::from_u32(key.to_u32()).to_string(), name);
        }
    }

    #[test]
    fn test_key_rejects_wrong_length() {
        assert!(matches!("TC0".parse::<SmcKey>(), Err(SmcError::InvalidKey(_))));
        assert!(matches!("TC0PX".parse::<SmcKey>(), Err(SmcError::InvalidKey(_))));
        assert!(matches!("".parse::<SmcKey>(), Err(SmcError::InvalidKey(_))));
    }

    #[test]
    fn test_key_rejects_non_ascii_and_control() {
        assert!("Té0".parse::<SmcKey>().is_err());
        assert!("T\n0P".parse::<SmcKey>().is_err());
    }

    #[test]
    fn test_fan_key_formatting() {
        assert_eq!(SmcKey::fan(0, "Ac").unwrap(), keys::FAN0_RPM_CUR);
        assert_eq!(SmcKey::fan(1, "Mx").unwrap(), keys::FAN1_RPM_MAX);
        assert_eq!(SmcKey::fan(0, "ID").unwrap(), keys::FAN0_ID);
        assert!(SmcKey::fan(10, "Ac").is_err());
    }

    #[test]
    fn test_data_type_unpacks_trailing_space() {
        let tag = DataType::from_u32(u32::from_be_bytes(*b"flt "));
        assert_eq!(tag, DataType::FLT);
        assert_eq!(tag.to_string(), "flt ");
        assert_eq!(DataType::UINT8.to_string(), "ui8 ");
    }

    #[test]
    fn test_data_type_display_masks_unprintable() {
        assert_eq!(DataType::from_bytes([b's', 0, b'7', 0xff]).to_string(), "s?7?");
        assert_eq!(DataType::default().to_string(), "????");
    }
}

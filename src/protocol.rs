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

//! Wire layout of an SMC transaction.
//!
//! The same structure is sent and received for every sub-command. Its
//! layout must match the kernel driver's byte for byte, hence `repr(C)`.

use crate::key::{DataType, SmcKey};

/// Entry point of the AppleSMC user client used for all transactions.
pub const KERNEL_INDEX_SMC: u32 = 2;

pub const CMD_READ_BYTES: u8 = 5;
/// Defined by the controller; never issued by this crate.
pub const CMD_WRITE_BYTES: u8 = 6;
pub const CMD_READ_INDEX: u8 = 8;
pub const CMD_READ_KEYINFO: u8 = 9;
pub const CMD_READ_PLIMIT: u8 = 11;
pub const CMD_READ_VERS: u8 = 12;

pub const SMC_BYTES_LEN: usize = 32;

pub type SmcBytes = [u8; SMC_BYTES_LEN];

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SmcVersion {
    pub major: u8,
    pub minor: u8,
    pub build: u8,
    pub reserved: [u8; 1],
    pub release: u16,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SmcPLimitData {
    pub version: u16,
    pub length: u16,
    pub cpu_p_limit: u32,
    pub gpu_p_limit: u32,
    pub mem_p_limit: u32,
}

/// Metadata for a key: payload size and encoding.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct KeyInfo {
    pub data_size: u32,
    pub data_type: u32,
    pub data_attributes: u8,
}

impl KeyInfo {
    pub fn new(data_size: u32, data_type: DataType) -> Self {
        Self { data_size, data_type: data_type.to_u32(), data_attributes: 0 }
    }

    pub fn data_type(&self) -> DataType {
        DataType::from_u32(self.data_type)
    }
}

/// One request or response of the SMC user client.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SmcKeyData {
    pub key: u32,
    pub vers: SmcVersion,
    pub p_limit_data: SmcPLimitData,
    pub key_info: KeyInfo,
    pub result: u8,
    pub status: u8,
    /// Sub-command selector (`CMD_*`).
    pub data8: u8,
    pub data32: u32,
    pub bytes: SmcBytes,
}

const _: () = assert!(std::mem::size_of::<SmcKeyData>() == 80);

impl SmcKeyData {
    /// Request for the size and type of `key`.
    pub fn key_info_request(key: SmcKey) -> Self {
        Self { key: key.to_u32(), data8: CMD_READ_KEYINFO, ..Self::default() }
    }

    /// Request for `data_size` bytes of `key`'s value.
    pub fn read_bytes_request(key: SmcKey, data_size: u32) -> Self {
        let mut req = Self { key: key.to_u32(), data8: CMD_READ_BYTES, ..Self::default() };
        req.key_info.data_size = data_size;
        req
    }

    pub fn sub_command(&self) -> u8 {
        self.data8
    }

    pub fn smc_key(&self) -> SmcKey {
        SmcKey::from_u32(self.key)
    }
}

/// The value of a key as read from the controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SmcVal {
    pub key: SmcKey,
    pub data_size: u32,
    pub data_type: DataType,
    /// Only the first `data_size` bytes are meaningful.
    pub bytes: SmcBytes,
}

impl SmcVal {
    pub fn new(key: SmcKey, data_type: DataType, payload: &[u8]) -> Self {
        let mut bytes = [0u8; SMC_BYTES_LEN];
        let n = payload.len().min(SMC_BYTES_LEN);
        bytes[..n].copy_from_slice(&payload[..n]);
        Self { key, data_size: n as u32, data_type, bytes }
    }

    pub fn payload(&self) -> &[u8] {
        let n = (self.data_size as usize).min(SMC_BYTES_LEN);
        &self.bytes[..n]
    }
}

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

use thiserror::Error;

use crate::key::{DataType, SmcKey};

/// Raw `kern_return_t` value reported by the kernel transport.
pub type KernReturn = i32;

#[derive(Error, Debug)]
pub enum SmcError {
    #[error("no SMC service found")]
    ServiceUnavailable,
    #[error("SMC service lookup failed: {0:#010x}")]
    ServiceLookupFailed(KernReturn),
    #[error("failed to open SMC service: {0:#010x}")]
    ServiceOpenFailed(KernReturn),
    #[error("SMC transaction failed: {0:#010x}")]
    Transport(KernReturn),
    #[error("unsupported data type {data_type} for key {key}")]
    DecodeUnsupported { key: SmcKey, data_type: DataType },
    #[error("invalid SMC key: {0:?}")]
    InvalidKey(String),
}

impl SmcError {
    /// The kernel return code, for errors that carry one.
    pub fn code(&self) -> Option<KernReturn> {
        match self {
            SmcError::ServiceLookupFailed(c) | SmcError::ServiceOpenFailed(c) | SmcError::Transport(c) => Some(*c),
            _ => None,
        }
    }
}

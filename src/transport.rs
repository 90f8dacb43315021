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

use crate::error::SmcError;
use crate::protocol::SmcKeyData;

/// An open session with the controller service.
///
/// Implementations are not required to be safe for concurrent calls;
/// [`crate::smc::Smc`] serializes them.
#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send {
    /// Send `input` to user-client method `index` and return the driver's reply.
    /// A non-success kernel status maps to [`SmcError::Transport`]. No retry.
    fn call(&mut self, index: u32, input: &SmcKeyData) -> Result<SmcKeyData, SmcError>;

    /// Release the underlying handle.
    fn close(&mut self) -> Result<(), SmcError>;
}

/// Placeholder for platforms without an SMC.
#[derive(Debug, Default)]
pub struct Unsupported;

impl Unsupported {
    pub fn open() -> Result<Self, SmcError> {
        Err(SmcError::ServiceUnavailable)
    }
}

impl Transport for Unsupported {
    fn call(&mut self, _index: u32, _input: &SmcKeyData) -> Result<SmcKeyData, SmcError> {
        Err(SmcError::ServiceUnavailable)
    }

    fn close(&mut self) -> Result<(), SmcError> {
        Ok(())
    }
}

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

//! smc-temp - read temperatures and fan speeds from the Apple SMC
//!
//! This library provides the key-value client for the System Management
//! Controller: key metadata lookup with caching, key reads, and decoding of
//! the controller's fixed-point and integer encodings.

pub mod key;
pub mod error;
pub mod protocol;
pub mod transport;
#[cfg(target_os = "macos")]
pub mod iokit;
pub mod cache;
pub mod decode;
pub mod smc;
pub mod fans;
pub mod report;
pub mod config;
pub mod cli;
pub mod logger;

#[cfg(test)]
pub mod test_utils;

pub use cache::KeyInfoCache;
pub use error::SmcError;
pub use key::{DataType, SmcKey};
pub use protocol::{KeyInfo, SmcVal};
pub use smc::Smc;
pub use transport::Transport;

/// Transport used by [`Smc::open`] on this platform.
#[cfg(target_os = "macos")]
pub type PlatformTransport = iokit::IoKitTransport;
#[cfg(not(target_os = "macos"))]
pub type PlatformTransport = transport::Unsupported;

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

//! SMC session: key metadata resolution, key reads and decoded readings.

use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::json;

use crate::cache::KeyInfoCache;
use crate::decode::{self, DecodeError};
use crate::error::SmcError;
use crate::key::SmcKey;
use crate::logger;
use crate::protocol::{KeyInfo, SmcKeyData, SmcVal, KERNEL_INDEX_SMC};
use crate::transport::Transport;
use crate::PlatformTransport;

/// An open session with the controller.
///
/// Safe to share between threads. Transactions on the handle are
/// serialized; the key-info cache has its own lock and is never held
/// while a transaction is in flight.
pub struct Smc<T: Transport> {
    transport: Mutex<T>,
    cache: Arc<KeyInfoCache>,
    closed: bool,
}

impl Smc<PlatformTransport> {
    /// Open the platform's SMC service with a fresh default-sized cache.
    pub fn open() -> Result<Self, SmcError> {
        Self::open_with_cache(Arc::new(KeyInfoCache::default()))
    }

    pub fn open_with_cache(cache: Arc<KeyInfoCache>) -> Result<Self, SmcError> {
        Ok(Self::new(PlatformTransport::open()?, cache))
    }
}

impl<T: Transport> Smc<T> {
    /// Wrap an already open transport.
    pub fn new(transport: T, cache: Arc<KeyInfoCache>) -> Self {
        Self { transport: Mutex::new(transport), cache, closed: false }
    }

    pub fn cache(&self) -> &Arc<KeyInfoCache> {
        &self.cache
    }

    fn transport(&self) -> MutexGuard<'_, T> {
        match self.transport.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn transact(&self, input: &SmcKeyData) -> Result<SmcKeyData, SmcError> {
        let result = self.transport().call(KERNEL_INDEX_SMC, input);
        if let Err(e) = &result {
            logger::log_event(
                "smc_transaction_error",
                json!({
                    "key": input.smc_key().to_string(),
                    "command": input.sub_command(),
                    "code": e.code(),
                    "error": e.to_string(),
                }),
            );
        }
        result
    }

    /// Size and type of `key`, from the cache when possible.
    pub fn key_info(&self, key: SmcKey) -> Result<KeyInfo, SmcError> {
        if let Some(info) = self.cache.get(key) {
            return Ok(info);
        }

        let reply = self.transact(&SmcKeyData::key_info_request(key))?;
        let info = reply.key_info;
        let cached = self.cache.insert(key, info);
        logger::log_event(
            "smc_keyinfo_miss",
            json!({
                "key": key.to_string(),
                "data_size": info.data_size,
                "data_type": info.data_type().to_string(),
                "cached": cached,
            }),
        );
        Ok(info)
    }

    /// Raw value of `key` along with its declared size and type.
    pub fn read_key(&self, key: SmcKey) -> Result<SmcVal, SmcError> {
        let info = self.key_info(key)?;
        let reply = self.transact(&SmcKeyData::read_bytes_request(key, info.data_size))?;
        Ok(SmcVal {
            key,
            data_size: info.data_size,
            data_type: info.data_type(),
            bytes: reply.bytes,
        })
    }

    pub fn try_temperature(&self, key: SmcKey) -> Result<f64, SmcError> {
        let val = self.read_key(key)?;
        decode::temperature(&val).map_err(|e| unsupported(&val, e))
    }

    pub fn try_fan_speed(&self, key: SmcKey) -> Result<f64, SmcError> {
        let val = self.read_key(key)?;
        decode::fan_speed(&val).map_err(|e| unsupported(&val, e))
    }

    pub fn try_fan_rpm(&self, key: SmcKey) -> Result<f32, SmcError> {
        let val = self.read_key(key)?;
        decode::fan_rpm(&val).map_err(|e| unsupported(&val, e))
    }

    /// Temperature in degrees Celsius, or `0.0` when it cannot be read.
    pub fn temperature(&self, key: SmcKey) -> f64 {
        self.try_temperature(key).unwrap_or(decode::TEMPERATURE_SENTINEL)
    }

    /// Fan speed, or `0.0` when it cannot be read.
    pub fn fan_speed(&self, key: SmcKey) -> f64 {
        self.try_fan_speed(key).unwrap_or(decode::FAN_SPEED_SENTINEL)
    }

    /// Fan RPM, or `-1.0` when it cannot be read.
    pub fn fan_rpm(&self, key: SmcKey) -> f32 {
        self.try_fan_rpm(key).unwrap_or(decode::FAN_RPM_SENTINEL)
    }

    /// Release the handle. Consuming `self` rules out a second close.
    pub fn close(mut self) -> Result<(), SmcError> {
        self.closed = true;
        self.transport().close()
    }
}

impl<T: Transport> Drop for Smc<T> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.transport().close() {
            logger::log_event("smc_close_error", json!({ "error": e.to_string() }));
        }
    }
}

// Empty values fold into the same variant: nothing decodable came back.
fn unsupported(val: &SmcVal, _err: DecodeError) -> SmcError {
    SmcError::DecodeUnsupported { key: val.key, data_type: val.data_type }
}

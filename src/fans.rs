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

use serde_json::json;

use crate::decode;
use crate::error::SmcError;
use crate::key::{keys, SmcKey};
use crate::logger;
use crate::protocol::SmcVal;
use crate::smc::Smc;
use crate::transport::Transport;

/// Offset of the fan name inside an `F<i>ID` value.
const FAN_NAME_OFFSET: usize = 4;

/// Fans `F0..F9`; a two-digit index does not fit a 4-byte key.
pub const MAX_ADDRESSABLE_FANS: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct FanReading {
    pub index: usize,
    pub name: String,
    pub actual_rpm: f32,
    pub min_rpm: f32,
    pub max_rpm: f32,
}

impl FanReading {
    /// Current speed as a percentage of the maximum.
    pub fn percent(&self) -> f32 {
        100.0 * self.actual_rpm / self.max_rpm
    }

    pub fn rpm_above_min(&self) -> f32 {
        (self.actual_rpm - self.min_rpm).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FanSummary {
    /// Fan count reported by the controller, including fans that could not be read.
    pub count: u32,
    pub fans: Vec<FanReading>,
}

/// Name stored in an `F<i>ID` value: the bytes after the header, up to the first NUL.
pub fn fan_name(val: &SmcVal) -> String {
    let tail = &val.bytes[FAN_NAME_OFFSET..];
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    String::from_utf8_lossy(&tail[..end]).into_owned()
}

pub fn fan_count<T: Transport>(smc: &Smc<T>) -> Result<u32, SmcError> {
    let val = smc.read_key(keys::FAN_COUNT)?;
    Ok(decode::unsigned(&val))
}

/// Read every fan the controller reports. A fan whose ID or any of its
/// current/min/max speeds cannot be read is left out. Only a failure to
/// read the fan count is an error. Indices past the last addressable key
/// are counted but never read.
pub fn read_fans<T: Transport>(smc: &Smc<T>) -> Result<FanSummary, SmcError> {
    let count = fan_count(smc)?;
    let addressable = count.min(MAX_ADDRESSABLE_FANS);
    if count > addressable {
        logger::log_event(
            "fans_unaddressable",
            json!({ "count": count, "first_index": addressable, "skipped": count - addressable }),
        );
    }
    let fans = (0..addressable as usize).filter_map(|i| read_fan(smc, i)).collect();
    Ok(FanSummary { count, fans })
}

fn read_fan<T: Transport>(smc: &Smc<T>, index: usize) -> Option<FanReading> {
    let skip = |reason: &str| -> Option<FanReading> {
        logger::log_event("fan_skipped", json!({ "index": index, "reason": reason }));
        None
    };

    let Ok(id_key) = SmcKey::fan(index, "ID") else { return skip("index out of key range") };
    let name = match smc.read_key(id_key) {
        Ok(val) => fan_name(&val),
        Err(_) => return skip("id read failed"),
    };

    let mut speeds = [0f32; 3];
    for (slot, suffix) in speeds.iter_mut().zip(["Ac", "Mn", "Mx"]) {
        let rpm = match SmcKey::fan(index, suffix) {
            Ok(key) => smc.fan_rpm(key),
            Err(_) => decode::FAN_RPM_SENTINEL,
        };
        if rpm < 0.0 {
            return skip(suffix);
        }
        *slot = rpm;
    }
    let [actual_rpm, min_rpm, max_rpm] = speeds;

    Some(FanReading { index, name, actual_rpm, min_rpm, max_rpm })
}

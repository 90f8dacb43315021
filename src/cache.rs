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

use std::sync::{Mutex, MutexGuard};

use crate::key::SmcKey;
use crate::protocol::KeyInfo;

pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Fixed-capacity, append-only store of key metadata.
///
/// Once full, further keys are not stored. Existing entries are never
/// evicted, so lookups keep hitting for every key seen before that point.
#[derive(Debug)]
pub struct KeyInfoCache {
    capacity: usize,
    entries: Mutex<Vec<(SmcKey, KeyInfo)>>,
}

impl Default for KeyInfoCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl KeyInfoCache {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, entries: Mutex::new(Vec::with_capacity(capacity)) }
    }

    // A poisoned lock still holds a consistent Vec: pushes are the only mutation.
    fn lock(&self) -> MutexGuard<'_, Vec<(SmcKey, KeyInfo)>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn get(&self, key: SmcKey) -> Option<KeyInfo> {
        self.lock().iter().find(|(k, _)| *k == key).map(|(_, info)| *info)
    }

    /// Store `info` for `key` if it is absent and there is room.
    /// Returns whether a new entry was added.
    pub fn insert(&self, key: SmcKey, info: KeyInfo) -> bool {
        let mut entries = self.lock();
        if entries.iter().any(|(k, _)| *k == key) || entries.len() >= self.capacity {
            return false;
        }
        entries.push((key, info));
        true
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }
}

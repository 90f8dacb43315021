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

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::key::{keys, SmcKey};
use crate::logger;

const MAX_CACHE_CAPACITY: usize = 1024;

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    C,
    F,
}

impl Metric {
    pub fn symbol(self) -> char {
        match self {
            Metric::C => 'C',
            Metric::F => 'F',
        }
    }

    pub fn convert(self, celsius: f64) -> f64 {
        match self {
            Metric::C => celsius,
            Metric::F => celsius * (9.0 / 5.0) + 32.0,
        }
    }
}

fn default_metric() -> Metric { Metric::C }
fn default_cpu_key() -> String { keys::DEFAULT_CPU.to_string() }
fn default_gpu_key() -> String { keys::DEFAULT_GPU.to_string() }
fn default_cache_capacity() -> usize { DEFAULT_CACHE_CAPACITY }

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SavedConfig {
    #[serde(default = "default_metric")]
    pub metric: Metric,
    /// Key read for the CPU temperature
    #[serde(default = "default_cpu_key")]
    pub cpu_key: String,
    /// Key read for the GPU temperature
    #[serde(default = "default_gpu_key")]
    pub gpu_key: String,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Where `--logging` writes events; a system default is used when unset
    #[serde(default)]
    pub log_path: Option<PathBuf>,
}

impl Default for SavedConfig {
    fn default() -> Self {
        Self {
            metric: default_metric(),
            cpu_key: default_cpu_key(),
            gpu_key: default_gpu_key(),
            cache_capacity: default_cache_capacity(),
            log_path: None,
        }
    }
}

impl SavedConfig {
    pub fn cpu_key(&self) -> SmcKey {
        self.cpu_key.parse().unwrap_or(keys::DEFAULT_CPU)
    }

    pub fn gpu_key(&self) -> SmcKey {
        self.gpu_key.parse().unwrap_or(keys::DEFAULT_GPU)
    }
}

pub fn config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("smc-temp").join("config.json");
    }
    if let Ok(home) = env::var("HOME") {
        return Path::new(&home)
            .join(".config")
            .join("smc-temp")
            .join("config.json");
    }
    PathBuf::from("/etc/smc-temp/config.json")
}

pub fn validate_saved_config(cfg: &SavedConfig) -> Result<(), String> {
    cfg.cpu_key.parse::<SmcKey>().map_err(|e| format!("cpu_key: {}", e))?;
    cfg.gpu_key.parse::<SmcKey>().map_err(|e| format!("gpu_key: {}", e))?;
    if cfg.cache_capacity == 0 || cfg.cache_capacity > MAX_CACHE_CAPACITY {
        return Err(format!("cache_capacity out of range (1..{})", MAX_CACHE_CAPACITY));
    }
    if let Some(p) = &cfg.log_path {
        if p.as_os_str().is_empty() {
            return Err("log_path must not be empty".to_string());
        }
    }
    Ok(())
}

pub fn try_load_config_from(path: &Path) -> Result<SavedConfig, String> {
    let data = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let cfg: SavedConfig = serde_json::from_str(&data).map_err(|e| format!("parse error: {}", e))?;
    validate_saved_config(&cfg)?;
    Ok(cfg)
}

/// The user's config when present and valid, defaults otherwise.
pub fn load_or_default() -> SavedConfig {
    let path = config_path();
    if !path.exists() {
        return SavedConfig::default();
    }
    match try_load_config_from(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            logger::log_event("config_invalid", json!({ "path": path.display().to_string(), "error": e }));
            SavedConfig::default()
        }
    }
}

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

//! Opt-in JSON-lines event log. Events are dropped until
//! [`init_logging`] or [`init_logging_at`] has been called.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use lazy_static::lazy_static;
use serde_json::{json, Value};

const DEFAULT_LOG_PATH: &str = "/var/log/smc-temp/logs.json";
const FALLBACK_LOG_PATH: &str = "/tmp/smc_temp_logs.json";

lazy_static! {
    static ref LOG_FILE: Mutex<Option<File>> = Mutex::new(None);
}

fn log_file() -> MutexGuard<'static, Option<File>> {
    match LOG_FILE.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

fn open_append(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

pub fn init_logging() {
    init_logging_at(Path::new(DEFAULT_LOG_PATH));
}

/// Start logging to `path`, falling back to /tmp when it cannot be opened.
pub fn init_logging_at(path: &Path) {
    let file = open_append(path).or_else(|| open_append(Path::new(FALLBACK_LOG_PATH)));
    *log_file() = file;
}

pub fn shutdown_logging() {
    *log_file() = None;
}

pub fn log_event(event: &str, data: Value) {
    let mut guard = log_file();
    let Some(f) = guard.as_mut() else { return };
    let line = json!({
        "ts_ms": now_millis(),
        "event": event,
        "data": data,
    })
    .to_string();
    let _ = writeln!(f, "{}", line);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn events(path: &Path) -> Vec<Value> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    #[serial]
    fn test_log_event_writes_json_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("events.json");
        init_logging_at(&path);
        log_event("unit_test", json!({ "key": "TC0P" }));
        shutdown_logging();

        let logged = events(&path);
        let ev = logged.iter().find(|e| e["event"] == "unit_test").unwrap();
        assert_eq!(ev["data"]["key"], "TC0P");
        assert!(ev["ts_ms"].as_u64().unwrap() > 0);
    }

    #[test]
    #[serial]
    fn test_log_event_without_init_is_dropped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        init_logging_at(&path);
        shutdown_logging();
        log_event("dropped", json!({}));

        assert!(events(&path).iter().all(|e| e["event"] != "dropped"));
    }

    #[test]
    #[serial]
    fn test_log_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        init_logging_at(&path);
        log_event("first", json!({}));
        shutdown_logging();
        init_logging_at(&path);
        log_event("second", json!({}));
        shutdown_logging();

        let names: Vec<_> = events(&path).iter().map(|e| e["event"].as_str().unwrap().to_string()).collect();
        let first = names.iter().position(|n| n == "first").unwrap();
        let second = names.iter().position(|n| n == "second").unwrap();
        assert!(first < second);
    }
}

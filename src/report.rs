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

use std::io::{self, Write};

use serde_json::json;

use crate::config::Metric;
use crate::fans::{self, FanSummary};
use crate::key::SmcKey;
use crate::logger;
use crate::smc::Smc;
use crate::transport::Transport;

/// What to print and how.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSpec {
    pub metric: Metric,
    pub cpu_key: SmcKey,
    pub gpu_key: SmcKey,
    pub cpu: bool,
    pub gpu: bool,
    pub fan: bool,
    pub titles: bool,
}

pub fn write_temperature<W: Write>(out: &mut W, title: &str, celsius: f64, metric: Metric) -> io::Result<()> {
    writeln!(out, "{}{:.1} °{}", title, metric.convert(celsius), metric.symbol())
}

pub fn write_fans<W: Write>(out: &mut W, summary: &FanSummary) -> io::Result<()> {
    writeln!(out, "Num fans: {}", summary.count)?;
    for fan in &summary.fans {
        writeln!(
            out,
            "Fan {} - {} at {:.0} RPM ({:.0}%)",
            fan.index,
            fan.name,
            fan.actual_rpm,
            fan.percent()
        )?;
    }
    Ok(())
}

/// Print the selected readings. Unreadable temperatures print as zero; a
/// missing fan count prints no fan section.
pub fn write_report<W: Write, T: Transport>(out: &mut W, smc: &Smc<T>, spec: &ReportSpec) -> io::Result<()> {
    let title = |t: &'static str| if spec.titles { t } else { "" };

    if spec.cpu {
        write_temperature(out, title("CPU: "), smc.temperature(spec.cpu_key), spec.metric)?;
    }
    if spec.gpu {
        write_temperature(out, title("GPU: "), smc.temperature(spec.gpu_key), spec.metric)?;
    }
    if spec.fan {
        match fans::read_fans(smc) {
            Ok(summary) => write_fans(out, &summary)?,
            Err(e) => logger::log_event("fan_count_error", json!({ "error": e.to_string() })),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fans::FanReading;

    fn render<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_temperature_line() {
        assert_eq!(render(|o| write_temperature(o, "", 64.0, Metric::C)), "64.0 °C\n");
        assert_eq!(render(|o| write_temperature(o, "CPU: ", 64.0, Metric::F)), "CPU: 147.2 °F\n");
        assert_eq!(render(|o| write_temperature(o, "GPU: ", 0.0, Metric::C)), "GPU: 0.0 °C\n");
    }

    #[test]
    fn test_fan_lines() {
        let summary = FanSummary {
            count: 2,
            fans: vec![FanReading {
                index: 0,
                name: "Left side".to_string(),
                actual_rpm: 1999.6,
                min_rpm: 1200.0,
                max_rpm: 4000.0,
            }],
        };
        assert_eq!(
            render(|o| write_fans(o, &summary)),
            "Num fans: 2\nFan 0 - Left side at 2000 RPM (50%)\n"
        );
    }

    #[test]
    fn test_no_fans() {
        let summary = FanSummary { count: 0, fans: Vec::new() };
        assert_eq!(render(|o| write_fans(o, &summary)), "Num fans: 0\n");
    }
}

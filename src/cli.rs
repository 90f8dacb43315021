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

//! getopt-style flag parsing for the `smc-temp` binary.

use crate::config::Metric;

pub const USAGE: &str = "\
usage: smc-temp <options>
Options:
  -F  Display temperatures in degrees Fahrenheit.
  -C  Display temperatures in degrees Celsius (Default).
  -c  Display CPU temperature (Default).
  -g  Display GPU temperature.
  -f  Display fan speeds.
  -h  Display this help.
  --logging  Append JSON event logs.

If more than one of -c, -f, or -g are specified, titles will be added
";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Scale from the command line; `None` defers to the config file
    pub metric: Option<Metric>,
    pub cpu: bool,
    pub gpu: bool,
    pub fan: bool,
    pub help: bool,
    pub logging: bool,
}

impl Options {
    /// CPU is reported when neither GPU nor fans were asked for.
    pub fn show_cpu(&self) -> bool {
        self.cpu || !(self.gpu || self.fan)
    }

    pub fn show_titles(&self) -> bool {
        [self.show_cpu(), self.gpu, self.fan].iter().filter(|b| **b).count() > 1
    }
}

/// Parse arguments, excluding the program name. Short flags may be
/// combined (`-cf`); an unknown flag requests help, as getopt's `?` does.
/// Parsing stops at `--` or at the first argument that is not a flag.
pub fn parse_args<I, S>(args: I) -> Options
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut opts = Options::default();
    for arg in args {
        let arg = arg.as_ref();
        if arg == "--logging" {
            opts.logging = true;
            continue;
        }
        if arg == "--" {
            break;
        }
        let Some(flags) = arg.strip_prefix('-') else { break };
        if flags.is_empty() || flags.starts_with('-') {
            opts.help = true;
            continue;
        }
        for c in flags.chars() {
            match c {
                'C' => opts.metric = Some(Metric::C),
                'F' => opts.metric = Some(Metric::F),
                'c' => opts.cpu = true,
                'g' => opts.gpu = true,
                'f' => opts.fan = true,
                _ => opts.help = true,
            }
        }
    }
    opts
}

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

use std::io::{stdout, Write};
use std::sync::Arc;

use anyhow::Context;

use smc_temp::cli::{parse_args, USAGE};
use smc_temp::config::load_or_default;
use smc_temp::logger;
use smc_temp::report::{write_report, ReportSpec};
use smc_temp::{KeyInfoCache, Smc};

fn main() -> anyhow::Result<()> {
    // Gather args once
    let args: Vec<String> = std::env::args().collect();
    let opts = parse_args(args.iter().skip(1));

    if opts.help {
        print!("{}", USAGE);
        std::process::exit(255);
    }

    let cfg = load_or_default();

    if opts.logging {
        match &cfg.log_path {
            Some(p) => logger::init_logging_at(p),
            None => logger::init_logging(),
        }
        logger::log_event("startup", serde_json::json!({
            "args": args,
            "cpu_key": cfg.cpu_key,
            "gpu_key": cfg.gpu_key,
        }));
    }

    let smc = match Smc::open_with_cache(Arc::new(KeyInfoCache::new(cfg.cache_capacity))) {
        Ok(smc) => smc,
        Err(e) => {
            eprintln!("error: {}", e);
            logger::log_event("fatal_error", serde_json::json!({ "error": e.to_string(), "code": e.code() }));
            std::process::exit(1);
        }
    };

    let spec = ReportSpec {
        metric: opts.metric.unwrap_or(cfg.metric),
        cpu_key: cfg.cpu_key(),
        gpu_key: cfg.gpu_key(),
        cpu: opts.show_cpu(),
        gpu: opts.gpu,
        fan: opts.fan,
        titles: opts.show_titles(),
    };

    let mut out = stdout().lock();
    write_report(&mut out, &smc, &spec).context("writing report")?;
    out.flush()?;

    smc.close().context("closing SMC connection")?;
    Ok(())
}

mod cli;
mod error_fmt;
mod interactive;
mod render;
mod run;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::{Result, WrapErr};
use gate_config::Config;
use gate_core::error::GateError;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let cli = Cli::parse();
    let json = cli.json;
    let _ = JSON_MODE.set(json);

    if let Err(e) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn real_main(cli: Cli) -> Result<()> {
    let _ = color_eyre::install();

    let cfg = load_config(cli.config.as_deref())?;
    // Dropping the guard flushes the file sink.
    let _file_guard = init_tracing(&cli, &cfg)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&shutdown);
        ctrlc::set_handler(move || {
            tracing::info!("received Ctrl-C, shutting down");
            flag.store(true, Ordering::SeqCst);
        })
        .wrap_err("install Ctrl-C handler")?;
    }

    match cli.cmd {
        Commands::Run {
            scenario,
            duration,
            dt,
            every,
        } => {
            let scenario = scenario
                .as_deref()
                .map(|p| {
                    gate_config::load_scenario_csv(p)
                        .map_err(|e| eyre::Report::new(GateError::Scenario(format!("{e:#}"))))
                })
                .transpose()?;
            let opts = run::RunOptions {
                duration_s: duration,
                dt,
                every,
                json: cli.json,
            };
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            run::run_headless(&mut out, &cfg, scenario.as_ref(), opts, &shutdown)?;
            Ok(())
        }
        Commands::Interactive { max_seconds } => {
            interactive::run_interactive(&cfg, cli.json, max_seconds, shutdown)
        }
        Commands::SelfCheck => self_check(&cfg, cli.json),
    }
}

/// Defaults when no file is given; the result is validated either way.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let cfg = match path {
        Some(p) => gate_config::load_file(p),
        None => {
            let cfg = Config::default();
            cfg.validate().map(|()| cfg)
        }
    };
    cfg.map_err(|e| eyre::Report::new(GateError::Config(format!("{e:#}"))))
}

fn init_tracing(cli: &Cli, cfg: &Config) -> Result<Option<WorkerGuard>> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let mut layers = Vec::new();
    if cli.json {
        layers.push(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_filter(console_filter)
                .boxed(),
        );
    } else {
        layers.push(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(console_filter)
                .boxed(),
        );
    }

    let mut guard = None;
    if let Some(file) = cfg.logging.file.as_deref() {
        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .ok_or_else(|| eyre::eyre!("logging.file {file:?} has no file name"))?;
        let appender = match cfg.logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, file_guard) = tracing_appender::non_blocking(appender);
        guard = Some(file_guard);
        let file_filter = EnvFilter::new(cfg.logging.level.as_deref().unwrap_or("info"));
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(file_filter)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| eyre::eyre!("init tracing: {e}"))?;
    Ok(guard)
}

fn self_check(cfg: &Config, json: bool) -> Result<()> {
    // Building the simulation runs the controller and plant validation too.
    let _sim = gate_core::Simulation::from_config(cfg)?;
    let (d, t, r, tr) = (&cfg.drive, &cfg.thresholds, &cfg.ramps, &cfg.travel);
    if json {
        println!(
            "{}",
            serde_json::json!({
                "status": "ok",
                "nominal_v": d.nominal_v,
                "thresholds": { "slow_off": t.slow_off, "slow_on": t.slow_on, "critical": t.critical },
                "ramps": { "accel_s": r.accel_s, "decel_s": r.decel_s },
                "sample_period_ms": cfg.sampling.period_ms,
                "travel": { "close2": tr.close2, "close1": tr.close1, "open1": tr.open1, "open2": tr.open2 },
            })
        );
    } else {
        println!(
            "config ok: nominal {:.1} V (half {:.1}, slow {:.1}), force thresholds {}/{}/{}, ramps {:.1}/{:.1} s, sample {} ms, travel limits {:.2}/{:.2} .. {:.2}/{:.2}",
            d.nominal_v,
            d.nominal_v * d.half_fraction,
            d.nominal_v * d.slow_fraction,
            t.slow_off,
            t.slow_on,
            t.critical,
            r.accel_s,
            r.decel_s,
            cfg.sampling.period_ms,
            tr.close2,
            tr.close1,
            tr.open1,
            tr.open2,
        );
    }
    Ok(())
}

//! Headless runs: fixed tick, optional CSV scenario, text or JSON lines out.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use eyre::WrapErr;
use gate_config::{Config, Scenario};
use gate_core::{Diagnostics, OperatorInput, Simulation};
use serde_json::json;

use crate::render::{event_line, status_line, tick_json};

// Scenario times and tick starts are compared with this much slack.
const TIME_SLACK_S: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub duration_s: f64,
    pub dt: f64,
    pub every: u32,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub ticks: u64,
    pub emergency_stops: usize,
    pub last: Diagnostics,
}

pub fn run_headless<W: Write>(
    out: &mut W,
    cfg: &Config,
    scenario: Option<&Scenario>,
    opts: RunOptions,
    shutdown: &AtomicBool,
) -> eyre::Result<RunSummary> {
    if !(opts.dt.is_finite() && opts.dt > 0.0) {
        eyre::bail!("--dt must be a positive number of seconds, got {}", opts.dt);
    }
    if !(opts.duration_s.is_finite() && opts.duration_s >= 0.0) {
        eyre::bail!(
            "--duration must be a non-negative number of seconds, got {}",
            opts.duration_s
        );
    }
    let every = u64::from(opts.every.max(1));

    let mut sim = Simulation::from_config(cfg)?;
    let empty = Scenario::default();
    let mut steps = scenario.unwrap_or(&empty).steps().iter().peekable();

    let mut ticks = 0u64;
    let mut emergency_stops = 0usize;
    let mut last_printed = None;
    let mut last = sim.diagnostics();

    while sim.elapsed_s() + TIME_SLACK_S < opts.duration_s {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!(t_s = sim.elapsed_s(), "run interrupted");
            break;
        }
        let start = sim.elapsed_s();
        let mut due = Vec::new();
        while let Some(row) = steps.next_if(|r| r.at_s <= start + TIME_SLACK_S) {
            due.push(OperatorInput::from(row));
        }

        let report = sim.tick(opts.dt, due);
        emergency_stops += report
            .events
            .iter()
            .filter(|e| matches!(e, gate_core::ControlEvent::EmergencyStop { .. }))
            .count();

        if ticks % every == 0 || !report.events.is_empty() {
            emit(out, opts.json, start, &report)?;
            last_printed = Some(ticks);
        }
        last = report.diagnostics;
        ticks += 1;
    }

    let skipped = steps.count();
    if skipped > 0 {
        tracing::warn!(skipped, "scenario steps after the end of the run were not applied");
    }

    if ticks > 0 && last_printed != Some(ticks - 1) {
        if opts.json {
            writeln!(out, "{}", tick_json(&last, 0, &[]))?;
        } else {
            writeln!(out, "{}", status_line(&last))?;
        }
    }

    let summary = RunSummary {
        ticks,
        emergency_stops,
        last,
    };
    write_summary(out, opts.json, &summary)?;
    Ok(summary)
}

fn emit<W: Write>(
    out: &mut W,
    json: bool,
    start: f64,
    report: &gate_core::TickReport,
) -> eyre::Result<()> {
    if json {
        writeln!(
            out,
            "{}",
            tick_json(&report.diagnostics, report.cycles, &report.events)
        )?;
    } else {
        for event in &report.events {
            writeln!(out, "{}", event_line(start, event))?;
        }
        writeln!(out, "{}", status_line(&report.diagnostics))?;
    }
    Ok(())
}

fn write_summary<W: Write>(out: &mut W, json: bool, s: &RunSummary) -> eyre::Result<()> {
    if json {
        let v = json!({
            "summary": {
                "ticks": s.ticks,
                "t_s": s.last.t_s,
                "state": s.last.state,
                "position": s.last.position,
                "latched": s.last.latched,
                "emergency_stops": s.emergency_stops,
            }
        });
        writeln!(out, "{v}")?;
    } else {
        writeln!(
            out,
            "final: state={} position={:.3} t={:.2}s ticks={} emergency_stops={}",
            s.last.state, s.last.position, s.last.t_s, s.ticks, s.emergency_stops
        )?;
    }
    out.flush().wrap_err("flush output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gate_core::GateState;

    fn opts(duration_s: f64) -> RunOptions {
        RunOptions {
            duration_s,
            dt: 0.25,
            every: 1_000,
            json: false,
        }
    }

    #[test]
    fn plain_run_without_inputs_stays_idle() {
        let mut out = Vec::new();
        let s = run_headless(
            &mut out,
            &Config::default(),
            None,
            opts(2.0),
            &AtomicBool::new(false),
        )
        .unwrap();
        assert_eq!(s.ticks, 8);
        assert_eq!(s.last.state, GateState::Idle);
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().last().unwrap().starts_with("final: state=IDLE"));
    }

    #[test]
    fn rejects_non_positive_dt() {
        let mut o = opts(1.0);
        o.dt = 0.0;
        let err = run_headless(
            &mut Vec::new(),
            &Config::default(),
            None,
            o,
            &AtomicBool::new(false),
        )
        .unwrap_err();
        assert!(err.to_string().contains("--dt"));
    }

    #[test]
    fn shutdown_flag_ends_run_early() {
        let s = run_headless(
            &mut Vec::new(),
            &Config::default(),
            None,
            opts(60.0),
            &AtomicBool::new(true),
        )
        .unwrap();
        assert_eq!(s.ticks, 0);
    }
}

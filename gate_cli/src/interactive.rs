//! Real-time driver: a stdin reader thread feeds the input queue, the main
//! loop ticks the simulation at `sim.frame_hz`.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use gate_config::Config;
use gate_core::{Button, FramePacer, InputQueue, InputSender, OperatorInput, Simulation};
use gate_traits::{MonotonicClock, Obstacle};

use crate::render::{event_line, status_line, tick_json};

/// One parsed key from an input line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Key {
    Input(OperatorInput),
    Quit,
    Unknown(char),
}

/// Parse every non-blank character of `line`; `+`/`-` move force by `force_step`.
pub fn parse_keys(line: &str, force_step: f64) -> Vec<Key> {
    line.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c.to_ascii_lowercase() {
            'o' => Key::Input(OperatorInput::Press(Button::Open)),
            'c' => Key::Input(OperatorInput::Press(Button::Close)),
            '1' => Key::Input(OperatorInput::ToggleObstacle(Obstacle::First)),
            '2' => Key::Input(OperatorInput::ToggleObstacle(Obstacle::Second)),
            '+' => Key::Input(OperatorInput::ForceDelta(force_step)),
            '-' => Key::Input(OperatorInput::ForceDelta(-force_step)),
            'r' => Key::Input(OperatorInput::ResetSensors),
            'q' => Key::Quit,
            other => Key::Unknown(other),
        })
        .collect()
}

fn spawn_reader(tx: InputSender, force_step: f64, quit: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            for key in parse_keys(&line, force_step) {
                match key {
                    Key::Input(input) => {
                        if tx.send(input).is_err() {
                            return;
                        }
                    }
                    Key::Quit => {
                        quit.store(true, Ordering::SeqCst);
                        return;
                    }
                    Key::Unknown(c) => tracing::warn!(key = %c, "unknown command key"),
                }
            }
        }
        tracing::debug!("stdin closed");
        quit.store(true, Ordering::SeqCst);
    });
}

pub fn run_interactive(
    cfg: &Config,
    json: bool,
    max_seconds: Option<f64>,
    shutdown: Arc<AtomicBool>,
) -> eyre::Result<()> {
    let mut sim = Simulation::from_config(cfg)?;
    let queue = InputQueue::new();
    spawn_reader(queue.sender(), cfg.sim.force_step, Arc::clone(&shutdown));

    let mut pacer = FramePacer::new(MonotonicClock::new(), cfg.sim.frame_hz);
    let status_every = u64::from((cfg.sim.frame_hz / 2).max(1));
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    tracing::info!(frame_hz = cfg.sim.frame_hz, "interactive session started");

    let mut frame = 0u64;
    loop {
        let start = sim.elapsed_s();
        let dt = pacer.wait_frame();
        // Read before draining: anything sent ahead of a quit is in the queue
        // by then and gets applied on this last tick.
        let quitting = shutdown.load(Ordering::SeqCst);
        let report = sim.tick_queued(dt, &queue);

        if json {
            if frame % status_every == 0 || !report.events.is_empty() {
                writeln!(
                    out,
                    "{}",
                    tick_json(&report.diagnostics, report.cycles, &report.events)
                )?;
            }
        } else {
            for event in &report.events {
                writeln!(out, "{}", event_line(start, event))?;
            }
            if frame % status_every == 0 {
                writeln!(out, "{}", status_line(&report.diagnostics))?;
            }
        }
        out.flush()?;
        frame += 1;

        if quitting {
            break;
        }
        if max_seconds.is_some_and(|m| sim.elapsed_s() >= m) {
            break;
        }
    }

    if !json {
        writeln!(out, "{}", status_line(&sim.diagnostics()))?;
        if sim.log().is_empty() {
            writeln!(out, "log (newest first): empty")?;
        } else {
            writeln!(out, "log (newest first):")?;
            for line in sim.log().rendered() {
                writeln!(out, "  {line}")?;
            }
        }
    }
    tracing::info!(t_s = sim.elapsed_s(), "interactive session ended");
    Ok(())
}

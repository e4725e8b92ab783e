//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "gatesim", version, about = "Gate actuator control simulator")]
pub struct Cli {
    /// Path to config TOML; built-in defaults when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit JSON lines instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG overrides
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Headless run at a fixed tick, optionally driven by a CSV scenario
    Run {
        /// Operator scenario CSV (headers: at_s,action,value)
        #[arg(long, value_name = "FILE")]
        scenario: Option<PathBuf>,
        /// Simulated seconds to run
        #[arg(long, value_name = "SECS", default_value_t = 60.0)]
        duration: f64,
        /// Tick length in seconds
        #[arg(long, value_name = "SECS", default_value_t = 0.25)]
        dt: f64,
        /// Print every Nth tick (ticks with events are always printed)
        #[arg(long, value_name = "N", default_value_t = 4)]
        every: u32,
    },
    /// Real-time run; reads key commands from stdin
    #[command(long_about = "Real-time run paced at sim.frame_hz.\n\n\
        Commands, one or more per line:\n  \
        o  press open\n  \
        c  press close\n  \
        1  toggle obstacle sensor 1\n  \
        2  toggle obstacle sensor 2\n  \
        +  raise force by sim.force_step\n  \
        -  lower force by sim.force_step\n  \
        r  reset sensors\n  \
        q  quit (end of input also quits)")]
    Interactive {
        /// Stop after this many seconds of wall time
        #[arg(long, value_name = "SECS")]
        max_seconds: Option<f64>,
    },
    /// Load and validate the config, then print a summary
    SelfCheck,
}

#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and operator-scenario parsing for the gate simulator.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//!   Every section is optional; an empty file yields the stock parameterization.
//! - `scenario` loads timed operator actions from CSV for headless runs.
use serde::Deserialize;

pub mod scenario;

pub use scenario::{Scenario, ScenarioAction, ScenarioRow, load_scenario_csv, parse_scenario_csv};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Drive {
    /// Nominal drive voltage (V).
    pub nominal_v: f64,
    /// Limit-1 deceleration level as a fraction of nominal.
    pub half_fraction: f64,
    /// Slow-mode level as a fraction of nominal.
    pub slow_fraction: f64,
    /// Output DAC full-scale voltage (V).
    pub dac_vmax: f64,
    pub dac_bits: u32,
    /// Clamp on commanded/nominal in the plant speed law.
    pub max_speed_ratio: f64,
}

impl Default for Drive {
    fn default() -> Self {
        Self {
            nominal_v: 116.0,
            half_fraction: 0.5,
            slow_fraction: 0.3,
            dac_vmax: 120.0,
            dac_bits: 8,
            max_speed_ratio: 1.2,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Sensor {
    /// Upper bound of the force/stress range (kgf/mm²).
    pub force_max: f64,
    /// Strain-gauge output voltage at `force_max`.
    pub force_sensor_vmax: f64,
    /// Input ADC reference voltage.
    pub adc_vref: f64,
    pub adc_bits: u32,
}

impl Default for Sensor {
    fn default() -> Self {
        Self {
            force_max: 120.0,
            force_sensor_vmax: 15.0,
            adc_vref: 19.5,
            adc_bits: 8,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Thresholds {
    /// Leave slow mode once force drops below this.
    pub slow_off: f64,
    /// Enter slow mode at or above this.
    pub slow_on: f64,
    /// Emergency stop at or above this.
    pub critical: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            slow_off: 55.0,
            slow_on: 70.0,
            critical: 95.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Ramps {
    pub accel_s: f64,
    pub decel_s: f64,
}

impl Default for Ramps {
    fn default() -> Self {
        Self {
            accel_s: 12.0,
            decel_s: 5.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Travel {
    pub open1: f64,
    pub open2: f64,
    pub close1: f64,
    pub close2: f64,
    /// Seconds for full travel at nominal voltage.
    pub full_travel_s: f64,
}

impl Default for Travel {
    fn default() -> Self {
        Self {
            open1: 0.80,
            open2: 1.00,
            close1: 0.20,
            close2: 0.00,
            full_travel_s: 30.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Sampling {
    /// Fixed control sample period (ms).
    pub period_ms: u64,
}

impl Default for Sampling {
    fn default() -> Self {
        Self { period_ms: 250 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Sim {
    /// Rendering tick rate used by the interactive driver.
    pub frame_hz: u32,
    /// Force added or removed by one `+`/`-` key in interactive mode.
    pub force_step: f64,
}

impl Default for Sim {
    fn default() -> Self {
        Self {
            frame_hz: 60,
            force_step: 25.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
    /// Capacity of the on-screen event log.
    pub max_lines: usize,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            file: None,
            level: None,
            rotation: None,
            max_lines: 12,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub drive: Drive,
    pub sensor: Sensor,
    pub thresholds: Thresholds,
    pub ramps: Ramps,
    pub travel: Travel,
    pub sampling: Sampling,
    pub sim: Sim,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse, and validate a config file.
pub fn load_file(path: &std::path::Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))?;
    cfg.validate()?;
    Ok(cfg)
}

fn positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Drive
        let d = &self.drive;
        if !positive(d.nominal_v) {
            eyre::bail!("drive.nominal_v must be > 0");
        }
        if !positive(d.dac_vmax) || !(d.nominal_v <= d.dac_vmax) {
            eyre::bail!("drive.nominal_v must not exceed drive.dac_vmax");
        }
        if !(1..=8).contains(&d.dac_bits) {
            eyre::bail!("drive.dac_bits must be in 1..=8 (port code field is 8 bits)");
        }
        if !(d.half_fraction > 0.0 && d.half_fraction < 1.0) {
            eyre::bail!("drive.half_fraction must be in (0.0, 1.0)");
        }
        if !(d.slow_fraction > 0.0 && d.slow_fraction < d.half_fraction) {
            eyre::bail!("drive.slow_fraction must be in (0.0, drive.half_fraction)");
        }
        if !(d.max_speed_ratio.is_finite() && d.max_speed_ratio >= 1.0) {
            eyre::bail!("drive.max_speed_ratio must be >= 1.0");
        }

        // Sensor
        let s = &self.sensor;
        if !positive(s.force_max) {
            eyre::bail!("sensor.force_max must be > 0");
        }
        if !positive(s.force_sensor_vmax) {
            eyre::bail!("sensor.force_sensor_vmax must be > 0");
        }
        if !positive(s.adc_vref) {
            eyre::bail!("sensor.adc_vref must be > 0");
        }
        if !(1..=8).contains(&s.adc_bits) {
            eyre::bail!("sensor.adc_bits must be in 1..=8 (port code field is 8 bits)");
        }

        // Thresholds: 0 <= slow_off < slow_on < critical <= force_max
        let t = &self.thresholds;
        if !(t.slow_off.is_finite() && t.slow_off >= 0.0) {
            eyre::bail!("thresholds.slow_off must be >= 0");
        }
        if !(t.slow_off < t.slow_on) {
            eyre::bail!("thresholds.slow_off must be < thresholds.slow_on");
        }
        if !(t.slow_on < t.critical) {
            eyre::bail!("thresholds.slow_on must be < thresholds.critical");
        }
        if !(t.critical <= s.force_max) {
            eyre::bail!("thresholds.critical must be <= sensor.force_max");
        }

        // Ramps
        if !positive(self.ramps.accel_s) {
            eyre::bail!("ramps.accel_s must be > 0");
        }
        if !positive(self.ramps.decel_s) {
            eyre::bail!("ramps.decel_s must be > 0");
        }

        // Travel: 0 <= close2 < close1 < open1 < open2 <= 1
        let tr = &self.travel;
        if !(tr.close2 >= 0.0 && tr.open2 <= 1.0) {
            eyre::bail!("travel positions must lie in [0.0, 1.0]");
        }
        if !(tr.close2 < tr.close1 && tr.close1 < tr.open1 && tr.open1 < tr.open2) {
            eyre::bail!("travel positions must satisfy close2 < close1 < open1 < open2");
        }
        if !positive(tr.full_travel_s) {
            eyre::bail!("travel.full_travel_s must be > 0");
        }

        // Sampling
        if self.sampling.period_ms == 0 {
            eyre::bail!("sampling.period_ms must be >= 1");
        }
        if self.sampling.period_ms > 60_000 {
            eyre::bail!("sampling.period_ms is unreasonably large (>60s)");
        }

        // Sim
        if self.sim.frame_hz == 0 {
            eyre::bail!("sim.frame_hz must be >= 1");
        }
        if !(self.sim.force_step.is_finite() && self.sim.force_step >= 0.0) {
            eyre::bail!("sim.force_step must be >= 0");
        }

        // Logging
        if self.logging.max_lines == 0 {
            eyre::bail!("logging.max_lines must be >= 1");
        }
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rot:?}");
        }

        Ok(())
    }
}

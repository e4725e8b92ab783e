//! Runtime configuration for the controller and port codec.
//!
//! These are separate from the TOML-deserialized config in `gate_config`;
//! see `conversions` for the mapping.

/// Drive-voltage levels and the output DAC.
#[derive(Debug, Clone, PartialEq)]
pub struct DriveCfg {
    /// Nominal drive voltage (V).
    pub nominal_v: f64,
    /// Limit-1 deceleration level, as a fraction of nominal.
    pub half_fraction: f64,
    /// Slow-mode level, as a fraction of nominal.
    pub slow_fraction: f64,
    /// DAC full-scale voltage (V).
    pub dac_vmax: f64,
    pub dac_bits: u32,
}

impl Default for DriveCfg {
    fn default() -> Self {
        Self {
            nominal_v: 116.0,
            half_fraction: 0.5,
            slow_fraction: 0.3,
            dac_vmax: 120.0,
            dac_bits: 8,
        }
    }
}

impl DriveCfg {
    #[inline]
    pub fn half_v(&self) -> f64 {
        self.nominal_v * self.half_fraction
    }

    #[inline]
    pub fn slow_v(&self) -> f64 {
        self.nominal_v * self.slow_fraction
    }
}

/// Force sensor chain: force range, strain-gauge voltage, input ADC.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorCfg {
    pub force_max: f64,
    /// Sensor output voltage at `force_max`.
    pub force_sensor_vmax: f64,
    pub adc_vref: f64,
    pub adc_bits: u32,
}

impl Default for SensorCfg {
    fn default() -> Self {
        Self {
            force_max: 120.0,
            force_sensor_vmax: 15.0,
            adc_vref: 19.5,
            adc_bits: 8,
        }
    }
}

impl SensorCfg {
    /// Strain-gauge output for a given force, linear through the origin.
    #[inline]
    pub fn force_to_volts(&self, force: f64) -> f64 {
        force.clamp(0.0, self.force_max) / self.force_max * self.force_sensor_vmax
    }
}

/// Force thresholds. Expected ordering: `slow_off < slow_on < critical`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdCfg {
    /// Slow mode is left once force drops below this.
    pub slow_off: f64,
    /// Slow mode is entered at or above this.
    pub slow_on: f64,
    /// Emergency stop at or above this.
    pub critical: f64,
}

impl Default for ThresholdCfg {
    fn default() -> Self {
        Self {
            slow_off: 55.0,
            slow_on: 70.0,
            critical: 95.0,
        }
    }
}

/// Ramp durations in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct RampCfg {
    /// Used when a button starts motion and when slow mode ends.
    pub accel_s: f64,
    /// Used for slow-mode entry, limit-1 deceleration and every stop.
    pub decel_s: f64,
}

impl Default for RampCfg {
    fn default() -> Self {
        Self {
            accel_s: 12.0,
            decel_s: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SamplingCfg {
    /// Control cycle period (ms).
    pub period_ms: u64,
}

impl Default for SamplingCfg {
    fn default() -> Self {
        Self { period_ms: 250 }
    }
}

impl SamplingCfg {
    #[inline]
    pub fn period_s(&self) -> f64 {
        self.period_ms as f64 / 1000.0
    }
}

/// Travel geometry handed to the plant model.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelCfg {
    pub open1: f64,
    pub open2: f64,
    pub close1: f64,
    pub close2: f64,
    /// Seconds for full travel at nominal voltage.
    pub full_travel_s: f64,
    /// Clamp on commanded/nominal in the speed law.
    pub max_speed_ratio: f64,
}

impl Default for TravelCfg {
    fn default() -> Self {
        Self {
            open1: 0.80,
            open2: 1.00,
            close1: 0.20,
            close2: 0.00,
            full_travel_s: 30.0,
            max_speed_ratio: 1.2,
        }
    }
}

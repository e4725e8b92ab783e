//! Validating builder for [`GateController`].
//!
//! Every part has a default; `build()` re-checks whatever was supplied so a
//! controller can never run with inverted thresholds or zero-length periods.

use crate::config::{DriveCfg, RampCfg, SamplingCfg, ThresholdCfg};
use crate::controller::GateController;
use crate::error::{BuildError, Result};

#[derive(Debug, Clone, Default)]
pub struct GateControllerBuilder {
    drive: Option<DriveCfg>,
    thresholds: Option<ThresholdCfg>,
    ramps: Option<RampCfg>,
    sampling: Option<SamplingCfg>,
}

impl GateController {
    /// Start building a controller.
    pub fn builder() -> GateControllerBuilder {
        GateControllerBuilder::default()
    }
}

impl GateControllerBuilder {
    pub fn with_drive(mut self, drive: DriveCfg) -> Self {
        self.drive = Some(drive);
        self
    }

    pub fn with_thresholds(mut self, thresholds: ThresholdCfg) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    pub fn with_ramps(mut self, ramps: RampCfg) -> Self {
        self.ramps = Some(ramps);
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingCfg) -> Self {
        self.sampling = Some(sampling);
        self
    }

    pub fn build(self) -> Result<GateController> {
        let drive = self.drive.unwrap_or_default();
        let thresholds = self.thresholds.unwrap_or_default();
        let ramps = self.ramps.unwrap_or_default();
        let sampling = self.sampling.unwrap_or_default();

        validate(&drive, &thresholds, &ramps, &sampling)?;
        Ok(GateController::from_parts(
            drive, thresholds, ramps, &sampling,
        ))
    }
}

fn invalid(msg: &'static str) -> eyre::Report {
    eyre::Report::new(BuildError::InvalidConfig(msg))
}

fn positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

fn validate(
    drive: &DriveCfg,
    thresholds: &ThresholdCfg,
    ramps: &RampCfg,
    sampling: &SamplingCfg,
) -> Result<()> {
    if !positive(drive.nominal_v) {
        return Err(invalid("nominal_v must be > 0"));
    }
    if !(drive.half_fraction > 0.0 && drive.half_fraction < 1.0) {
        return Err(invalid("half_fraction must be in (0, 1)"));
    }
    if !(drive.slow_fraction > 0.0 && drive.slow_fraction < drive.half_fraction) {
        return Err(invalid("slow_fraction must be in (0, half_fraction)"));
    }
    if !(positive(drive.dac_vmax) && drive.nominal_v <= drive.dac_vmax) {
        return Err(invalid("dac_vmax must be >= nominal_v"));
    }
    if !(1..=8).contains(&drive.dac_bits) {
        return Err(invalid("dac_bits must be in 1..=8"));
    }
    let t = thresholds;
    if !(t.slow_off >= 0.0 && t.slow_off < t.slow_on && t.slow_on < t.critical) {
        return Err(invalid(
            "thresholds must satisfy 0 <= slow_off < slow_on < critical",
        ));
    }
    if !(positive(ramps.accel_s) && positive(ramps.decel_s)) {
        return Err(invalid("ramp durations must be > 0"));
    }
    if sampling.period_ms == 0 {
        return Err(invalid("sampling period must be >= 1 ms"));
    }
    Ok(())
}

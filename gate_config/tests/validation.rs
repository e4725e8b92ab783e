use gate_config::{load_file, load_toml};
use rstest::rstest;
use std::fs;
use tempfile::tempdir;

#[test]
fn empty_file_is_stock_parameterization() {
    let cfg = load_toml("").expect("parse TOML");
    cfg.validate().expect("defaults must validate");
    assert_eq!(cfg.drive.nominal_v, 116.0);
    assert_eq!(cfg.thresholds.slow_on, 70.0);
    assert_eq!(cfg.thresholds.slow_off, 55.0);
    assert_eq!(cfg.thresholds.critical, 95.0);
    assert_eq!(cfg.sampling.period_ms, 250);
    assert_eq!(cfg.travel.open1, 0.8);
    assert_eq!(cfg.logging.max_lines, 12);
    assert_eq!(cfg.sim.force_step, 25.0);
}

#[test]
fn partial_sections_keep_other_defaults() {
    let toml = r#"
[thresholds]
critical = 100.0

[ramps]
accel_s = 6.0
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.thresholds.critical, 100.0);
    assert_eq!(cfg.thresholds.slow_on, 70.0);
    assert_eq!(cfg.ramps.accel_s, 6.0);
    assert_eq!(cfg.ramps.decel_s, 5.0);
}

#[rstest]
#[case("[thresholds]\nslow_off = 70.0\nslow_on = 70.0\n", "slow_off must be < thresholds.slow_on")]
#[case("[thresholds]\ncritical = 60.0\n", "slow_on must be < thresholds.critical")]
#[case("[thresholds]\ncritical = 130.0\n", "critical must be <= sensor.force_max")]
#[case("[travel]\nopen1 = 0.1\n", "close2 < close1 < open1 < open2")]
#[case("[travel]\nopen2 = 1.5\n", "must lie in [0.0, 1.0]")]
#[case("[ramps]\ndecel_s = 0.0\n", "ramps.decel_s must be > 0")]
#[case("[sampling]\nperiod_ms = 0\n", "sampling.period_ms must be >= 1")]
#[case("[drive]\nnominal_v = 130.0\n", "must not exceed drive.dac_vmax")]
#[case("[drive]\nslow_fraction = 0.6\n", "slow_fraction must be in")]
#[case("[drive]\ndac_bits = 0\n", "dac_bits must be in 1..=8")]
#[case("[sensor]\nadc_bits = 9\n", "adc_bits must be in 1..=8")]
#[case("[sim]\nframe_hz = 0\n", "frame_hz must be >= 1")]
#[case("[sim]\nforce_step = -1.0\n", "sim.force_step must be >= 0")]
#[case("[logging]\nmax_lines = 0\n", "max_lines must be >= 1")]
#[case("[logging]\nrotation = \"weekly\"\n", "rotation must be one of")]
fn rejects_invalid(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should be rejected");
    let msg = format!("{err}");
    assert!(msg.contains(needle), "got {msg:?}, wanted {needle:?}");
}

#[test]
fn load_file_parses_and_validates() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.toml");
    fs::write(&good, "[sampling]\nperiod_ms = 100\n").unwrap();
    assert_eq!(load_file(&good).unwrap().sampling.period_ms, 100);

    let bad = dir.path().join("bad.toml");
    fs::write(&bad, "[sampling]\nperiod_ms = 0\n").unwrap();
    assert!(load_file(&bad).is_err());

    let missing = dir.path().join("missing.toml");
    let err = load_file(&missing).unwrap_err();
    assert!(format!("{err}").contains("read config"));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    assert!(load_toml("[drive\nnominal_v = ").is_err());
    assert!(load_toml("[drive]\nnominal_v = \"high\"\n").is_err());
}

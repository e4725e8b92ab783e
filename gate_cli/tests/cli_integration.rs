use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_file(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["self-check"], 0, "config ok", "stdout")]
#[case(&["run", "--duration", "1"], 0, "final: state=IDLE", "stdout")]
#[case(&["run", "--dt", "0"], 1, "--dt", "stderr")]
#[case(&["frobnicate"], 2, "unrecognized subcommand", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let mut cmd = Command::cargo_bin("gatesim").unwrap();
    cmd.args(args);
    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => assert.stdout(predicate::str::contains(needle)),
        _ => assert.stderr(predicate::str::contains(needle)),
    };
}

#[rstest]
fn invalid_config_exits_3() {
    let dir = tempdir().unwrap();
    let cfg = write_file(
        &dir,
        "cfg.toml",
        "[thresholds]\nslow_off = 80.0\nslow_on = 70.0\n",
    );
    Command::cargo_bin("gatesim")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("self-check")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid configuration"))
        .stderr(predicate::str::contains("slow_off must be < thresholds.slow_on"));
}

#[rstest]
fn missing_config_file_exits_3() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("gatesim")
        .unwrap()
        .arg("--config")
        .arg(dir.path().join("nope.toml"))
        .arg("self-check")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("read config"));
}

#[rstest]
fn bad_scenario_exits_4() {
    let dir = tempdir().unwrap();
    let sc = write_file(&dir, "s.csv", "time,what\n0,open\n");
    Command::cargo_bin("gatesim")
        .unwrap()
        .args(["run", "--scenario"])
        .arg(&sc)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("at_s,action,value"));
}

#[rstest]
fn open_scenario_runs_to_full_travel() {
    let dir = tempdir().unwrap();
    let sc = write_file(&dir, "open.csv", "at_s,action,value\n0.5,open,\n");
    Command::cargo_bin("gatesim")
        .unwrap()
        .args(["run", "--duration", "60", "--scenario"])
        .arg(&sc)
        .assert()
        .success()
        .stdout(predicate::str::contains("opening started, target 116.0 V"))
        .stdout(predicate::str::contains("opening limit 1 reached, decelerating"))
        .stdout(predicate::str::contains("opening limit 2 reached, stopping"))
        .stdout(predicate::str::contains("final: state=IDLE position=1.000"));
}

#[rstest]
fn obstacle_scenario_ends_latched() {
    let dir = tempdir().unwrap();
    let sc = write_file(
        &dir,
        "obstacle.csv",
        "at_s,action,value\n0,open,\n4,obstacle2,1\n6,obstacle2,0\n",
    );
    Command::cargo_bin("gatesim")
        .unwrap()
        .args(["run", "--duration", "10", "--scenario"])
        .arg(&sc)
        .assert()
        .success()
        .stdout(predicate::str::contains("[00:04] EMERGENCY STOP: obstacle detected"))
        .stdout(predicate::str::contains("[00:06] obstacle 2 cleared"))
        .stdout(predicate::str::contains("final: state=STOPPED"))
        .stdout(predicate::str::contains("emergency_stops=1"));
}

#[rstest]
fn interactive_reads_commands_from_stdin() {
    assert_cmd::Command::cargo_bin("gatesim")
        .unwrap()
        .args(["interactive", "--max-seconds", "10"])
        .write_stdin("o\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("opening started"))
        .stdout(predicate::str::contains("log (newest first):"));
}

#[rstest]
fn interactive_force_keys_move_by_configured_step() {
    let dir = tempdir().unwrap();
    let cfg = write_file(&dir, "cfg.toml", "[sim]\nforce_step = 10.0\n");
    assert_cmd::Command::cargo_bin("gatesim")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .args(["interactive", "--max-seconds", "10"])
        .write_stdin("+++-\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("F= 20.0"));
}

#[rstest]
fn log_file_receives_json_lines() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("gatesim.log");
    let cfg = write_file(
        &dir,
        "cfg.toml",
        &format!(
            "[logging]\nfile = {:?}\nlevel = \"info\"\n",
            log.to_string_lossy()
        ),
    );
    let sc = write_file(&dir, "s.csv", "at_s,action,value\n0,open,\n");
    Command::cargo_bin("gatesim")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .args(["run", "--duration", "1", "--scenario"])
        .arg(&sc)
        .assert()
        .success();
    let text = fs::read_to_string(&log).unwrap();
    assert!(text.contains("motion started"), "log was: {text}");
}

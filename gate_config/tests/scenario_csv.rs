use gate_config::{ScenarioAction, load_scenario_csv, parse_scenario_csv};
use rstest::rstest;
use std::fs;
use tempfile::tempdir;

#[test]
fn parses_all_actions() {
    let csv = "\
at_s,action,value
0.0,open,
1.0,close,
2.0,obstacle1,1
2.5,obstacle2,0
3.0,toggle1,
3.5,toggle2,
4.0,force_delta,-12.5
5.0,reset,
";
    let sc = parse_scenario_csv(csv.as_bytes()).expect("valid scenario");
    let steps = sc.steps();
    assert_eq!(steps.len(), 8);
    assert_eq!(steps[0].action, ScenarioAction::Open);
    assert_eq!(steps[0].value, None);
    assert_eq!(steps[2].action, ScenarioAction::Obstacle1);
    assert_eq!(steps[2].value, Some(1.0));
    assert_eq!(steps[6].action, ScenarioAction::ForceDelta);
    assert_eq!(steps[6].value, Some(-12.5));
    assert_eq!(steps[7].action, ScenarioAction::Reset);
}

#[test]
fn rows_are_sorted_by_time() {
    let csv = "at_s,action,value\n5.0,close,\n0.0,open,\n2.0,force_delta,10\n";
    let sc = parse_scenario_csv(csv.as_bytes()).unwrap();
    let times: Vec<f64> = sc.steps().iter().map(|r| r.at_s).collect();
    assert_eq!(times, vec![0.0, 2.0, 5.0]);
}

#[test]
fn header_only_is_an_empty_scenario() {
    let sc = parse_scenario_csv("at_s,action,value\n".as_bytes()).unwrap();
    assert!(sc.steps().is_empty());
}

#[rstest]
#[case("time,action,value\n0,open,\n", "must have headers")]
#[case("at_s,action,value\n0,jump,\n", "invalid scenario row 2")]
#[case("at_s,action,value\n-1,open,\n", "at_s must be a finite time >= 0")]
#[case("at_s,action,value\n0,obstacle1,\n", "obstacle value must be 0 or 1")]
#[case("at_s,action,value\n0,obstacle2,0.5\n", "obstacle value must be 0 or 1")]
#[case("at_s,action,value\n0,open,\n1,force_delta,\n", "row 3: force_delta needs a finite value")]
fn rejects_bad_scenarios(#[case] csv: &str, #[case] needle: &str) {
    let err = parse_scenario_csv(csv.as_bytes()).expect_err("should fail");
    let msg = format!("{err}");
    assert!(msg.contains(needle), "got {msg:?}, wanted {needle:?}");
}

#[test]
fn loads_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sc.csv");
    fs::write(&path, "at_s,action,value\n0.25,open,\n").unwrap();
    let sc = load_scenario_csv(&path).unwrap();
    assert_eq!(sc.steps().len(), 1);

    let err = load_scenario_csv(&dir.path().join("nope.csv")).unwrap_err();
    assert!(format!("{err}").contains("open scenario CSV"));
}

#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(scenario) = gate_config::parse_scenario_csv(data) else {
        return;
    };
    // Replay the first few seconds of whatever loaded.
    let Ok(mut sim) = gate_core::Simulation::from_config(&gate_config::Config::default()) else {
        return;
    };
    let mut steps = scenario.steps().iter().peekable();
    while sim.elapsed_s() < 5.0 {
        let mut due = Vec::new();
        while let Some(row) = steps.next_if(|r| r.at_s <= sim.elapsed_s()) {
            due.push(gate_core::OperatorInput::from(row));
        }
        sim.tick(0.25, due);
    }
});

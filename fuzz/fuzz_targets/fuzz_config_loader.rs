#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not. Anything that
    // validates must also build a simulation and survive a few ticks.
    let Ok(cfg) = gate_config::load_toml(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }
    if let Ok(mut sim) = gate_core::Simulation::from_config(&cfg) {
        for _ in 0..8 {
            sim.tick(0.25, []);
        }
    }
});

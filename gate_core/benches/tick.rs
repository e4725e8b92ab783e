use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use gate_config::Config;
use gate_core::{Button, OperatorInput, Simulation};

// One simulated minute at 60 Hz: open, slow mode, back to nominal, full travel.
fn minute_at_60hz(c: &mut Criterion) {
    let dt = 1.0 / 60.0;
    c.bench_function("simulation_minute_60hz", |b| {
        b.iter_batched(
            || Simulation::from_config(&Config::default()).unwrap(),
            |mut sim| {
                for frame in 0..3_600u32 {
                    let inputs: &[OperatorInput] = match frame {
                        0 => &[OperatorInput::Press(Button::Open)],
                        600 => &[OperatorInput::ForceDelta(75.0)],
                        900 => &[OperatorInput::ForceDelta(-40.0)],
                        _ => &[],
                    };
                    black_box(sim.tick(dt, inputs.iter().copied()));
                }
                sim
            },
            BatchSize::SmallInput,
        );
    });
}

fn single_tick(c: &mut Criterion) {
    let mut sim = Simulation::from_config(&Config::default()).unwrap();
    sim.tick(0.25, [OperatorInput::Press(Button::Open)]);
    c.bench_function("simulation_tick", |b| {
        b.iter(|| black_box(sim.tick(black_box(1.0 / 60.0), [])));
    });
}

criterion_group!(benches, minute_at_60hz, single_tick);
criterion_main!(benches);

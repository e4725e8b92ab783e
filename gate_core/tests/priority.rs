//! Control-cycle priority, hysteresis, latching and limit handling, driven
//! directly through `GateController` with hand-built sensor snapshots.
//! Every step is one 250 ms sample period, so each `step` is one cycle.

use gate_core::{Button, ControlEvent, GateController, GateState, StopCause};
use gate_traits::{Direction, SensorSnapshot};
use rstest::{fixture, rstest};

const CYCLE: f64 = 0.25;

#[fixture]
fn opening() -> GateController {
    let mut c = GateController::builder().build().unwrap();
    c.begin_tick();
    assert!(c.press(Button::Open, &SensorSnapshot::default()));
    c
}

fn force(f: f64) -> SensorSnapshot {
    SensorSnapshot {
        force: f,
        ..SensorSnapshot::default()
    }
}

fn cycle(c: &mut GateController, s: &SensorSnapshot) -> Vec<ControlEvent> {
    c.begin_tick();
    assert_eq!(c.step(CYCLE, s), 1);
    c.take_events()
}

#[rstest]
fn obstacle_wins_over_simultaneous_critical_force(mut opening: GateController) {
    let s = SensorSnapshot {
        force: 110.0,
        obstacle2: true,
        ..SensorSnapshot::default()
    };
    let _ = opening.take_events();
    let events = cycle(&mut opening, &s);
    assert_eq!(opening.state(), GateState::Stopped);
    assert_eq!(opening.stop_cause(), Some(StopCause::Obstacle));
    assert_eq!(
        events,
        vec![ControlEvent::EmergencyStop {
            cause: StopCause::Obstacle,
            force: 110.0
        }]
    );
}

#[rstest]
#[case(95.0)]
#[case(120.0)]
fn critical_force_stops_and_latches(mut opening: GateController, #[case] f: f64) {
    cycle(&mut opening, &force(f));
    assert_eq!(opening.state(), GateState::Stopped);
    assert_eq!(opening.stop_cause(), Some(StopCause::CriticalForce));
    assert!(opening.is_latched());
    assert_eq!(opening.direction(), Direction::None);
    assert_eq!(opening.target_voltage(), 0.0);
    assert!(opening.pulses().ramp_armed);
}

#[rstest]
fn slow_mode_hysteresis(mut opening: GateController) {
    cycle(&mut opening, &force(72.0));
    assert!(opening.slow_mode());
    assert!((opening.target_voltage() - 34.8).abs() < 1e-9);

    cycle(&mut opening, &force(60.0));
    assert!(opening.slow_mode(), "between thresholds keeps slow mode");
    assert!(!opening.pulses().ramp_armed);

    cycle(&mut opening, &force(50.0));
    assert!(!opening.slow_mode());
    assert_eq!(opening.target_voltage(), 116.0);
    assert_eq!(opening.state(), GateState::Opening);
}

#[rstest]
fn latch_survives_cleared_obstacle(mut opening: GateController) {
    let blocked = SensorSnapshot {
        obstacle1: true,
        ..SensorSnapshot::default()
    };
    cycle(&mut opening, &blocked);
    assert_eq!(opening.state(), GateState::Stopped);

    for _ in 0..40 {
        let events = cycle(&mut opening, &SensorSnapshot::default());
        assert!(events.is_empty());
        assert_eq!(opening.state(), GateState::Stopped);
        assert!(opening.is_latched());
    }

    opening.begin_tick();
    assert!(opening.press(Button::Close, &SensorSnapshot::default()));
    assert_eq!(opening.state(), GateState::Closing);
    assert!(!opening.is_latched());
    assert_eq!(opening.stop_cause(), None);
}

#[rstest]
fn limit1_decelerates_once(mut opening: GateController) {
    let _ = opening.take_events();
    let at_limit1 = {
        let mut s = SensorSnapshot::default();
        s.limits.open1 = true;
        s
    };
    let mut decelerations = 0;
    let mut armed = 0;
    for _ in 0..10 {
        let events = cycle(&mut opening, &at_limit1);
        decelerations += events
            .iter()
            .filter(|e| matches!(e, ControlEvent::LimitDeceleration { .. }))
            .count();
        armed += usize::from(opening.pulses().ramp_armed);
    }
    assert_eq!(decelerations, 1);
    assert_eq!(armed, 1);
    assert_eq!(opening.target_voltage(), 58.0);
    assert_eq!(opening.state(), GateState::Opening);
}

#[rstest]
fn close_limits_ignored_while_opening(mut opening: GateController) {
    // A closed gate asserts both close switches.
    let mut s = SensorSnapshot::default();
    s.limits.close1 = true;
    s.limits.close2 = true;
    cycle(&mut opening, &s);
    assert_eq!(opening.state(), GateState::Opening);
    assert_eq!(opening.target_voltage(), 116.0);
}

#[rstest]
fn slow_mode_suppresses_limit1_and_recovers_to_half(mut opening: GateController) {
    cycle(&mut opening, &force(75.0));
    let mut s = force(75.0);
    s.limits.open1 = true;
    cycle(&mut opening, &s);
    assert!((opening.target_voltage() - 34.8).abs() < 1e-9);

    s.force = 40.0;
    cycle(&mut opening, &s);
    assert!(!opening.slow_mode());
    assert_eq!(opening.target_voltage(), 58.0);
}

#[rstest]
fn limit2_stops_even_in_slow_mode(mut opening: GateController) {
    cycle(&mut opening, &force(80.0));
    let mut s = force(60.0);
    s.limits.open1 = true;
    s.limits.open2 = true;
    let events = cycle(&mut opening, &s);
    assert_eq!(opening.state(), GateState::Idle);
    assert!(!opening.slow_mode());
    assert!(!opening.is_latched());
    assert_eq!(
        events,
        vec![ControlEvent::TravelComplete {
            direction: Direction::Open
        }]
    );
}

#[rstest]
fn held_buttons_release_once_settled(mut opening: GateController) {
    assert!(opening.buttons().open);
    let blocked = SensorSnapshot {
        obstacle1: true,
        ..SensorSnapshot::default()
    };
    cycle(&mut opening, &blocked);
    assert!(opening.buttons().open, "still ramping down");
    // 5 s decel ramp = 20 cycles.
    for _ in 0..20 {
        cycle(&mut opening, &blocked);
    }
    assert_eq!(opening.commanded_voltage(), 0.0);
    assert!(!opening.buttons().open && !opening.buttons().close);
}

#[rstest]
fn stopped_ignores_sensor_changes(mut opening: GateController) {
    cycle(&mut opening, &force(99.0));
    let before = (opening.state(), opening.target_voltage(), opening.stop_cause());
    let mut s = force(72.0);
    s.obstacle1 = true;
    s.limits.open2 = true;
    cycle(&mut opening, &s);
    assert_eq!(
        (opening.state(), opening.target_voltage(), opening.stop_cause()),
        before
    );
}

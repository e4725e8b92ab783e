#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::float_cmp,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Gate-actuator control core (hardware-agnostic).
//!
//! The controller sees the gate only through `gate_traits::Plant` snapshots
//! and answers with a commanded voltage and a direction.
//!
//! ## Architecture
//!
//! - **Quantizer**: saturating N-bit encode/decode (`quantizer`)
//! - **Ramps**: linear voltage transitions (`ramp`)
//! - **Control**: the priority-ordered state machine (`controller`), sampled
//!   at a fixed period independent of the tick rate (`sampler`)
//! - **Ports**: the two 16-bit register words (`ports`)
//! - **Simulation**: the per-tick data flow tying it all together (`runner`)
//!
//! ```
//! use gate_core::{GateController, OperatorInput, Simulation, status::Button};
//!
//! let mut sim = Simulation::from_config(&gate_config::Config::default())?;
//! let report = sim.tick(0.25, [OperatorInput::Press(Button::Open)]);
//! assert_eq!(report.diagnostics.state, gate_core::GateState::Opening);
//! # let _ = GateController::builder();
//! # Ok::<(), eyre::Report>(())
//! ```

pub mod builder;
pub mod config;
pub mod controller;
pub mod conversions;
pub mod error;
pub mod event_log;
pub mod input;
pub mod pacer;
pub mod ports;
pub mod quantizer;
pub mod ramp;
pub mod runner;
pub mod sampler;
pub mod status;

pub use builder::GateControllerBuilder;
pub use config::{DriveCfg, RampCfg, SamplingCfg, SensorCfg, ThresholdCfg, TravelCfg};
pub use controller::GateController;
pub use event_log::{EventLog, LogLine};
pub use input::{InputQueue, InputSender, OperatorInput};
pub use pacer::FramePacer;
pub use ports::{PortWords, decode_input, decode_output, encode_input, encode_output};
pub use quantizer::Quantizer;
pub use ramp::RampProfile;
pub use runner::{Diagnostics, Simulation, TickReport};
pub use sampler::FixedRateSampler;
pub use status::{Button, ControlEvent, GateState, StopCause};

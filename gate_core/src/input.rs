//! Operator inputs and the queue that carries them across threads.
//!
//! Producers (a stdin reader, a scenario player) send [`OperatorInput`]s at
//! any time; the simulation drains the queue once per tick boundary, before
//! the controller evaluates, so a sensor write can never land between two
//! priority checks.

use crossbeam_channel as xch;
use gate_traits::Obstacle;

use crate::error::{GateError, Result};
use crate::status::Button;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperatorInput {
    Press(Button),
    SetObstacle(Obstacle, bool),
    ToggleObstacle(Obstacle),
    /// Added to the sensed force; the plant clamps the result.
    ForceDelta(f64),
    /// Clear both obstacles and zero the force.
    ResetSensors,
}

#[derive(Debug)]
pub struct InputQueue {
    tx: xch::Sender<OperatorInput>,
    rx: xch::Receiver<OperatorInput>,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InputQueue {
    pub fn new() -> Self {
        let (tx, rx) = xch::unbounded();
        Self { tx, rx }
    }

    /// A cloneable handle for a producer thread.
    pub fn sender(&self) -> InputSender {
        InputSender(self.tx.clone())
    }

    /// Everything queued at the moment of the call, in send order.
    ///
    /// Inputs sent while draining wait for the next tick.
    pub fn drain(&self) -> Vec<OperatorInput> {
        let pending = self.rx.len();
        self.rx.try_iter().take(pending).collect()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct InputSender(xch::Sender<OperatorInput>);

impl InputSender {
    pub fn send(&self, input: OperatorInput) -> Result<()> {
        self.0
            .send(input)
            .map_err(|_| eyre::Report::new(GateError::QueueClosed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_order_and_empties() {
        let q = InputQueue::new();
        let tx = q.sender();
        tx.send(OperatorInput::Press(Button::Open)).unwrap();
        tx.send(OperatorInput::ForceDelta(5.0)).unwrap();
        assert_eq!(
            q.drain(),
            vec![
                OperatorInput::Press(Button::Open),
                OperatorInput::ForceDelta(5.0)
            ]
        );
        assert!(q.is_empty());
        assert!(q.drain().is_empty());
    }

    #[test]
    fn send_after_queue_dropped_is_typed_error() {
        let q = InputQueue::new();
        let tx = q.sender();
        drop(q);
        let err = tx.send(OperatorInput::ResetSensors).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GateError>(),
            Some(GateError::QueueClosed)
        ));
    }
}

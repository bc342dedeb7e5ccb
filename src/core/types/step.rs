//! One simulation tick.

use serde::{Deserialize, Serialize};

use super::frame::Frame;
use super::metadata::Metadata;

/// Number of action components: linear command, angular command.
pub const ACTION_DIM: usize = 2;

/// Observation, action, reward and termination for one tick.
///
/// The action is kept as the raw vector handed over by the input adapter.
/// Its arity is checked when the step enters an
/// [`EpisodeBuffer`](crate::session::EpisodeBuffer) and again when a log
/// record is decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Camera frame
    pub frame: Frame,
    /// Raw action vector `[linear, angular]`
    pub action: Vec<f64>,
    /// Reward returned by the simulator
    pub reward: f64,
    /// Episode termination flag
    pub done: bool,
    /// Simulator diagnostics
    pub metadata: Metadata,
}

impl Step {
    /// Create a new step.
    pub fn new(frame: Frame, action: Vec<f64>, reward: f64, done: bool, metadata: Metadata) -> Self {
        Self {
            frame,
            action,
            reward,
            done,
            metadata,
        }
    }

    /// `(linear, angular)` if the action has the right arity.
    #[inline]
    pub fn command(&self) -> Option<(f64, f64)> {
        match self.action.as_slice() {
            [linear, angular] => Some((*linear, *angular)),
            _ => None,
        }
    }

    /// Whether the action vector has exactly [`ACTION_DIM`] components.
    #[inline]
    pub fn has_valid_action(&self) -> bool {
        self.action.len() == ACTION_DIM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_requires_two_components() {
        let frame = Frame::filled(1, 1, [0, 0, 0]);
        let ok = Step::new(frame.clone(), vec![0.3, -1.2], 0.5, false, Metadata::new());
        assert_eq!(ok.command(), Some((0.3, -1.2)));
        assert!(ok.has_valid_action());

        let bad = Step::new(frame, vec![0.3], 0.5, false, Metadata::new());
        assert_eq!(bad.command(), None);
        assert!(!bad.has_valid_action());
    }
}

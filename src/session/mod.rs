//! Live recording session.
//!
//! The simulator and the joystick are external collaborators behind the
//! [`Simulator`] and [`ControlSource`] traits. [`run_session`] drives one
//! from the other, records every tick through a [`RecordingSession`] and
//! hands each finished episode to the review workflow.

mod buffer;
mod commands;
mod driver;
mod recorder;

pub use buffer::EpisodeBuffer;
pub use commands::{ControlInput, OperatorCommand};
pub use driver::{ControlSource, SimStep, Simulator, run_session};
pub use recorder::{
    DEFAULT_OUT_OF_BOUNDS_REWARD, InvalidStepPolicy, RecordingSession, SessionStats, StepStatus,
};

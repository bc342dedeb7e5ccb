//! End-of-episode review and offline playback.
//!
//! Both paths walk an episode through [`replay`], which pairs every step
//! with the duty cycles the shared [`KinematicsConverter`] produces, so a
//! reviewed episode and the same episode played back from the log render
//! identically.
//!
//! [`KinematicsConverter`]: crate::kinematics::KinematicsConverter

mod decision;
mod overlay;
mod playback;
mod render;
mod replay;
mod workflow;

pub use decision::{DecisionSource, REVIEW_PROMPT, ReviewDecision, ScriptedDecisions, TerminalPrompt};
pub use overlay::{OVERLAY_COLOR, draw_overlay};
pub use playback::{PlaybackSummary, play_log};
pub use render::{ConsoleRenderer, ReviewRenderer};
pub use replay::{ReplayStep, replay, telemetry_line};
pub use workflow::{ReviewOutcome, ReviewState, ReviewWorkflow};

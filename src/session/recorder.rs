//! Per-tick recording entry point.

use serde::{Deserialize, Serialize};

use super::buffer::EpisodeBuffer;
use crate::core::types::{Frame, Metadata, Step};
use crate::review::ReviewOutcome;

/// Reward the simulator reports when the vehicle leaves the road.
pub const DEFAULT_OUT_OF_BOUNDS_REWARD: f64 = -1000.0;

/// What to do with a step whose action has the wrong arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidStepPolicy {
    /// Drop the bad step, keep recording the episode
    #[default]
    Skip,
    /// Drop the whole episode; later steps are ignored until the next reset
    AbortEpisode,
}

/// Outcome of a single [`RecordingSession::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Appended to the buffer
    Recorded,
    /// Bad action arity, step dropped
    Rejected,
    /// Bad action arity, buffered episode dropped
    Aborted,
    /// Reward was the out-of-bounds sentinel, step not recorded
    OutOfBounds,
    /// Episode already aborted, waiting for reset
    Ignored,
}

/// Counters for one recording session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub steps_recorded: u64,
    pub steps_rejected: u64,
    pub steps_out_of_bounds: u64,
    pub steps_ignored: u64,
    pub episodes_aborted: u64,
    pub episodes_committed: u64,
    pub episodes_discarded: u64,
    /// Steps persisted across all committed episodes
    pub steps_committed: u64,
}

/// Owns the episode buffer and applies the recording rules to every tick.
#[derive(Debug)]
pub struct RecordingSession {
    buffer: EpisodeBuffer,
    policy: InvalidStepPolicy,
    out_of_bounds_reward: Option<f64>,
    aborted: bool,
    stats: SessionStats,
}

impl RecordingSession {
    /// `out_of_bounds_reward` of `None` records every step regardless of reward.
    pub fn new(policy: InvalidStepPolicy, out_of_bounds_reward: Option<f64>) -> Self {
        Self {
            buffer: EpisodeBuffer::new(),
            policy,
            out_of_bounds_reward,
            aborted: false,
            stats: SessionStats::default(),
        }
    }

    /// Record one simulation tick.
    ///
    /// `done` is not interpreted here; the caller decides when the episode
    /// ends and hands the buffer to review.
    pub fn step(
        &mut self,
        frame: Frame,
        action: Vec<f64>,
        reward: f64,
        done: bool,
        metadata: Metadata,
    ) -> StepStatus {
        if self.aborted {
            self.stats.steps_ignored += 1;
            return StepStatus::Ignored;
        }

        if self.out_of_bounds_reward == Some(reward) {
            self.stats.steps_out_of_bounds += 1;
            log::debug!("Recorder: Out-of-bounds step not recorded (done={})", done);
            return StepStatus::OutOfBounds;
        }

        let step = Step::new(frame, action, reward, done, metadata);
        let Err(e) = self.buffer.append(step) else {
            self.stats.steps_recorded += 1;
            return StepStatus::Recorded;
        };

        self.stats.steps_rejected += 1;
        match self.policy {
            InvalidStepPolicy::Skip => {
                log::warn!("Recorder: Skipping step: {}", e);
                StepStatus::Rejected
            }
            InvalidStepPolicy::AbortEpisode => {
                self.stats.episodes_aborted += 1;
                log::warn!(
                    "Recorder: Aborting episode after {} steps: {}",
                    self.buffer.len(),
                    e
                );
                self.buffer.clear();
                self.aborted = true;
                StepStatus::Aborted
            }
        }
    }

    /// Start a new episode after the simulator has been reset.
    pub fn begin_episode(&mut self) {
        if !self.buffer.is_empty() {
            log::warn!(
                "Recorder: New episode started with {} unreviewed steps, dropping them",
                self.buffer.len()
            );
            self.buffer.clear();
        }
        self.aborted = false;
    }

    /// Whether the current episode was aborted by an invalid step.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn buffer(&self) -> &EpisodeBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut EpisodeBuffer {
        &mut self.buffer
    }

    /// Fold a review result into the counters.
    pub fn record_outcome(&mut self, outcome: &ReviewOutcome) {
        match outcome {
            ReviewOutcome::Committed(info) => {
                self.stats.episodes_committed += 1;
                self.stats.steps_committed += info.steps as u64;
            }
            ReviewOutcome::Discarded { .. } => self.stats.episodes_discarded += 1,
            ReviewOutcome::Empty => {}
        }
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new(InvalidStepPolicy::Skip, Some(DEFAULT_OUT_OF_BOUNDS_REWARD))
    }
}

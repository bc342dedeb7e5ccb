//! Live recording loop.

use super::commands::{ControlInput, OperatorCommand};
use super::recorder::{RecordingSession, SessionStats, StepStatus};
use crate::core::types::{Frame, Metadata};
use crate::error::{Error, Result};
use crate::io::episode_log::LogWriter;
use crate::review::{DecisionSource, ReviewRenderer, ReviewWorkflow};

/// Reviews attempted for one episode before giving up on it.
const MAX_REVIEW_ATTEMPTS: usize = 3;

/// Observation returned by one simulator tick.
#[derive(Debug, Clone)]
pub struct SimStep {
    pub frame: Frame,
    pub reward: f64,
    pub done: bool,
    pub metadata: Metadata,
}

/// Environment being driven.
pub trait Simulator {
    /// Start a new episode.
    fn reset(&mut self) -> Result<()>;

    /// Advance one tick with `[linear, angular]`.
    fn step(&mut self, action: [f64; 2]) -> Result<SimStep>;
}

/// Driving input, already mapped to semantic commands.
pub trait ControlSource {
    /// Next sample, or `None` once the input device is gone.
    fn poll(&mut self) -> Result<Option<ControlInput>>;
}

/// Drive `sim` from `controls` until the operator quits.
///
/// Each non-idle sample steps the simulator and is recorded into
/// `session`. When the simulator reports `done` or the operator presses
/// reset, the buffered episode goes through `workflow` and the simulator
/// is reset. On quit or exhausted input any pending episode is reviewed
/// before the writer is closed.
///
/// A review that fails (for example a commit that could not be written)
/// is retried with the episode still buffered. Operator input closing
/// mid-review ends the session with [`Error::InputClosed`].
pub fn run_session<S, C, R, D>(
    sim: &mut S,
    controls: &mut C,
    workflow: &mut ReviewWorkflow<R, D>,
    mut writer: LogWriter,
    session: &mut RecordingSession,
) -> Result<SessionStats>
where
    S: Simulator,
    C: ControlSource,
    R: ReviewRenderer,
    D: DecisionSource,
{
    log::info!("Session: Recording to {}", writer.path().display());
    sim.reset()?;
    session.begin_episode();

    loop {
        let Some(input) = controls.poll()? else {
            log::info!("Session: Control input closed");
            break;
        };

        match input.command {
            Some(OperatorCommand::Quit) => {
                log::info!("Session: Quit requested");
                break;
            }
            Some(OperatorCommand::Reset) => {
                log::info!("Session: Reset requested");
                end_episode(sim, workflow, &mut writer, session)?;
                continue;
            }
            Some(command @ (OperatorCommand::Commit | OperatorCommand::Discard)) => {
                log::warn!(
                    "Session: Ignoring {} outside of a review",
                    command.name()
                );
                continue;
            }
            None => {}
        }

        if input.is_idle() {
            continue;
        }

        let action = input.action();
        let tick = sim.step(action)?;
        let done = tick.done;
        let status = session.step(tick.frame, action.to_vec(), tick.reward, done, tick.metadata);
        if status == StepStatus::Recorded {
            log::trace!(
                "Session: Step {} linear={:.2} angular={:.2} reward={:.2}",
                session.buffer().len(),
                input.linear,
                input.angular,
                tick.reward
            );
        }

        if done {
            log::info!("Session: Episode finished by simulator");
            end_episode(sim, workflow, &mut writer, session)?;
        }
    }

    if !session.buffer().is_empty() {
        review_until_settled(workflow, &mut writer, session)?;
    }
    writer.close()?;

    let stats = session.stats().clone();
    log::info!(
        "Session: Done, {} episodes committed, {} discarded, {} steps recorded",
        stats.episodes_committed,
        stats.episodes_discarded,
        stats.steps_recorded
    );
    Ok(stats)
}

fn end_episode<S, R, D>(
    sim: &mut S,
    workflow: &mut ReviewWorkflow<R, D>,
    writer: &mut LogWriter,
    session: &mut RecordingSession,
) -> Result<()>
where
    S: Simulator,
    R: ReviewRenderer,
    D: DecisionSource,
{
    review_until_settled(workflow, writer, session)?;
    sim.reset()?;
    session.begin_episode();
    Ok(())
}

fn review_until_settled<R, D>(
    workflow: &mut ReviewWorkflow<R, D>,
    writer: &mut LogWriter,
    session: &mut RecordingSession,
) -> Result<()>
where
    R: ReviewRenderer,
    D: DecisionSource,
{
    let mut attempt = 1;
    loop {
        match workflow.review(session.buffer_mut(), writer) {
            Ok(outcome) => {
                session.record_outcome(&outcome);
                return Ok(());
            }
            Err(Error::InputClosed) => return Err(Error::InputClosed),
            Err(e) if attempt < MAX_REVIEW_ATTEMPTS => {
                log::warn!(
                    "Session: Review attempt {} failed, episode kept for retry: {}",
                    attempt,
                    e
                );
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

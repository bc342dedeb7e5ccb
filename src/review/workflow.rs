//! Commit/discard state machine run at the end of every episode.

use super::decision::{DecisionSource, REVIEW_PROMPT, ReviewDecision};
use super::overlay::draw_overlay;
use super::render::ReviewRenderer;
use super::replay::replay;
use crate::error::{Error, Result};
use crate::io::episode_log::{LogWriter, RecordInfo};
use crate::io::export::DutyExporter;
use crate::kinematics::KinematicsConverter;
use crate::session::EpisodeBuffer;

/// Where the workflow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    /// No episode under review; recording may proceed
    Idle,
    /// An episode has been rendered and awaits a decision
    Reviewing,
}

/// Result of a completed review.
#[derive(Debug, Clone)]
pub enum ReviewOutcome {
    /// Episode written to the log and buffer cleared
    Committed(RecordInfo),
    /// Buffer cleared without writing
    Discarded {
        /// Steps dropped
        steps: usize,
    },
    /// Nothing was buffered; no prompt shown
    Empty,
}

/// Renders a finished episode, asks the operator, then commits or discards.
///
/// A failed commit leaves the episode in the buffer and the workflow in
/// [`ReviewState::Reviewing`], so calling [`review`](Self::review) again
/// retries with the same data.
///
/// # Example
///
/// ```ignore
/// use smriti::review::{ConsoleRenderer, ReviewWorkflow, TerminalPrompt};
///
/// let mut workflow = ReviewWorkflow::new(converter, ConsoleRenderer::new(), TerminalPrompt::stdio());
/// match workflow.review(&mut buffer, &mut writer)? {
///     ReviewOutcome::Committed(info) => println!("saved {} steps", info.steps),
///     ReviewOutcome::Discarded { steps } => println!("dropped {} steps", steps),
///     ReviewOutcome::Empty => {}
/// }
/// ```
pub struct ReviewWorkflow<R, D> {
    converter: KinematicsConverter,
    renderer: R,
    decisions: D,
    exporter: Option<DutyExporter>,
    overlay: bool,
    state: ReviewState,
    episodes_reviewed: usize,
}

impl<R: ReviewRenderer, D: DecisionSource> ReviewWorkflow<R, D> {
    pub fn new(converter: KinematicsConverter, renderer: R, decisions: D) -> Self {
        Self {
            converter,
            renderer,
            decisions,
            exporter: None,
            overlay: true,
            state: ReviewState::Idle,
            episodes_reviewed: 0,
        }
    }

    /// Append duty rows of every committed episode to `exporter`.
    pub fn with_exporter(mut self, exporter: DutyExporter) -> Self {
        self.exporter = Some(exporter);
        self
    }

    /// Toggle drawing command bars on review frames.
    pub fn with_overlay(mut self, overlay: bool) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn state(&self) -> ReviewState {
        self.state
    }

    pub fn converter(&self) -> &KinematicsConverter {
        &self.converter
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn decisions(&self) -> &D {
        &self.decisions
    }

    pub fn decisions_mut(&mut self) -> &mut D {
        &mut self.decisions
    }

    /// Review the buffered episode and act on the operator's decision.
    pub fn review(
        &mut self,
        buffer: &mut EpisodeBuffer,
        writer: &mut LogWriter,
    ) -> Result<ReviewOutcome> {
        if buffer.is_empty() {
            log::debug!("ReviewWorkflow: Nothing buffered, skipping review");
            self.state = ReviewState::Idle;
            return Ok(ReviewOutcome::Empty);
        }

        self.state = ReviewState::Reviewing;
        self.episodes_reviewed += 1;
        log::info!(
            "ReviewWorkflow: Reviewing episode {} ({} steps, reward {:.2})",
            self.episodes_reviewed,
            buffer.len(),
            buffer.episode().total_reward()
        );

        self.render(buffer)?;

        match self.await_decision()? {
            ReviewDecision::Commit => self.commit(buffer, writer),
            ReviewDecision::Discard => {
                let steps = buffer.len();
                buffer.clear();
                self.state = ReviewState::Idle;
                log::info!("ReviewWorkflow: Discarded {} steps", steps);
                Ok(ReviewOutcome::Discarded { steps })
            }
        }
    }

    fn render(&mut self, buffer: &EpisodeBuffer) -> Result<()> {
        let steps = buffer.steps();
        self.renderer
            .begin_episode(self.episodes_reviewed, steps.len())?;
        for step in replay(steps, &self.converter) {
            let canvas = self
                .overlay
                .then(|| draw_overlay(&step.step.frame, step.linear, step.angular));
            self.renderer.render(&step, canvas.as_ref())?;
        }
        Ok(())
    }

    fn await_decision(&mut self) -> Result<ReviewDecision> {
        loop {
            let Some(answer) = self.decisions.prompt(REVIEW_PROMPT)? else {
                log::warn!("ReviewWorkflow: Operator input closed, episode kept in memory");
                return Err(Error::InputClosed);
            };
            match ReviewDecision::parse(&answer) {
                Some(decision) => return Ok(decision),
                None => log::warn!(
                    "ReviewWorkflow: Unrecognised answer {:?}, expected commit or discard",
                    answer.trim()
                ),
            }
        }
    }

    fn commit(
        &mut self,
        buffer: &mut EpisodeBuffer,
        writer: &mut LogWriter,
    ) -> Result<ReviewOutcome> {
        let info = match writer.write_episode(buffer.episode()) {
            Ok(info) => info,
            Err(e) => {
                log::error!(
                    "ReviewWorkflow: Commit failed, {} steps kept in memory for retry: {}",
                    buffer.len(),
                    e
                );
                return Err(e);
            }
        };

        if let Some(exporter) = self.exporter.as_mut()
            && let Err(e) = exporter.write_episode(buffer.episode(), &self.converter)
        {
            log::warn!(
                "ReviewWorkflow: Duty export to {} failed: {}",
                exporter.path().display(),
                e
            );
        }

        buffer.clear();
        self.state = ReviewState::Idle;
        log::info!(
            "ReviewWorkflow: Committed {} steps to {} ({} records this session)",
            info.steps,
            info.path.display(),
            writer.records_written()
        );
        Ok(ReviewOutcome::Committed(info))
    }
}

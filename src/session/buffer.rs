//! In-memory buffer for the episode being driven.

use crate::core::types::{ACTION_DIM, Episode, Step};
use crate::error::{Error, Result};

/// Ordered steps of the episode currently being recorded.
///
/// Grows by [`append`](Self::append) while driving and is emptied in one
/// go by [`clear`](Self::clear) or [`take`](Self::take) once the episode
/// has been committed or discarded. There is no capacity bound.
#[derive(Debug, Clone, Default)]
pub struct EpisodeBuffer {
    episode: Episode,
}

impl EpisodeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step to the tail.
    ///
    /// Steps whose action does not have exactly two components are
    /// rejected with [`Error::InvalidStep`] and the buffer is unchanged.
    pub fn append(&mut self, step: Step) -> Result<()> {
        if !step.has_valid_action() {
            return Err(Error::InvalidStep {
                expected: ACTION_DIM,
                actual: step.action.len(),
            });
        }
        self.episode.steps.push(step);
        Ok(())
    }

    /// Drop every buffered step.
    pub fn clear(&mut self) {
        self.episode.steps.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.episode.is_empty()
    }

    pub fn len(&self) -> usize {
        self.episode.len()
    }

    pub fn steps(&self) -> &[Step] {
        &self.episode.steps
    }

    /// Buffered steps as an episode, ready for the log writer.
    pub fn episode(&self) -> &Episode {
        &self.episode
    }

    /// Move the buffered episode out, leaving the buffer empty.
    pub fn take(&mut self) -> Episode {
        std::mem::take(&mut self.episode)
    }
}

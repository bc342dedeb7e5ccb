//! Review rendering targets.

use std::time::Duration;

use super::replay::{ReplayStep, telemetry_line};
use crate::core::types::Frame;
use crate::error::Result;
use crate::io::frames::FrameDumper;

/// Receives every step of an episode being reviewed or played back.
///
/// Implementations must not assume they can modify the recording; they
/// only ever see shared references.
pub trait ReviewRenderer {
    /// Called before the first step of each episode.
    fn begin_episode(&mut self, _episode: usize, _steps: usize) -> Result<()> {
        Ok(())
    }

    /// Show one step. `canvas` is the overlaid frame when overlays are on.
    fn render(&mut self, step: &ReplayStep<'_>, canvas: Option<&Frame>) -> Result<()>;
}

/// Logs a telemetry line per step, optionally pacing output and saving
/// overlaid frames to disk.
pub struct ConsoleRenderer {
    delay: Duration,
    dumper: Option<FrameDumper>,
    episode: usize,
    rendered: u64,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self {
            delay: Duration::ZERO,
            dumper: None,
            episode: 0,
            rendered: 0,
        }
    }

    /// Pause between steps, like a viewer running at a fixed frame rate.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Save each canvas (or raw frame) as PNG.
    pub fn with_dumper(mut self, dumper: FrameDumper) -> Self {
        self.dumper = Some(dumper);
        self
    }

    /// Steps rendered so far.
    pub fn rendered(&self) -> u64 {
        self.rendered
    }
}

impl Default for ConsoleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewRenderer for ConsoleRenderer {
    fn begin_episode(&mut self, episode: usize, steps: usize) -> Result<()> {
        self.episode = episode;
        log::info!("Episode {}: {} steps", episode, steps);
        Ok(())
    }

    fn render(&mut self, step: &ReplayStep<'_>, canvas: Option<&Frame>) -> Result<()> {
        log::info!("{}", telemetry_line(step));

        if let Some(dumper) = self.dumper.as_mut() {
            let frame = canvas.unwrap_or(&step.step.frame);
            dumper.save(frame, self.episode, step.index)?;
        }

        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.rendered += 1;
        Ok(())
    }
}

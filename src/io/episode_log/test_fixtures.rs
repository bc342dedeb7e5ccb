//! Test fixtures for generating synthetic episode logs.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::writer::LogWriter;
use crate::core::types::{Episode, Frame, MetaValue, Metadata, Step};

/// Frame size used by synthetic steps.
const FIXTURE_HEIGHT: u32 = 4;
const FIXTURE_WIDTH: u32 = 6;

/// Test fixture for episode log testing.
///
/// Creates a temporary log file with synthetic episodes. The temporary
/// directory is cleaned up when the fixture is dropped.
pub struct LogTestFixture {
    temp_dir: TempDir,
    log_path: PathBuf,
    episodes: Vec<Episode>,
}

impl LogTestFixture {
    /// Synthetic episode of `steps` steps.
    ///
    /// Commands ramp forward while alternating turn direction; the last
    /// step is marked done. Frame bytes encode the step index so frame
    /// equality checks are meaningful.
    pub fn episode(steps: usize) -> Episode {
        let steps = (0..steps)
            .map(|i| {
                let shade = (i % 256) as u8;
                let frame = Frame::filled(FIXTURE_HEIGHT, FIXTURE_WIDTH, [shade, 255 - shade, 42]);
                let linear = 0.1 * (i as f64 + 1.0);
                let angular = if i % 2 == 0 { 0.5 } else { -0.5 };

                let mut metadata = Metadata::new();
                metadata.insert("timestamp".to_string(), MetaValue::Float(i as f64 / 30.0));
                metadata.insert("tile_coords".to_string(), vec![1i64, 6].into());
                metadata.insert("msg".to_string(), "".into());

                Step::new(
                    frame,
                    vec![linear, angular],
                    1.0 - 0.01 * i as f64,
                    i + 1 == steps,
                    metadata,
                )
            })
            .collect();
        Episode::new(steps)
    }

    /// Log file holding one synthetic episode per entry of `lengths`.
    pub fn with_episodes(lengths: &[usize]) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log_path = temp_dir.path().join("episodes.log");

        let mut writer = LogWriter::open(&log_path).expect("Failed to open writer");
        let episodes: Vec<Episode> = lengths.iter().map(|&n| Self::episode(n)).collect();
        for episode in &episodes {
            writer
                .write_episode(episode)
                .expect("Failed to write episode");
        }
        writer.close().expect("Failed to close writer");

        Self {
            temp_dir,
            log_path,
            episodes,
        }
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Episodes written, in order.
    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    /// Scratch directory that lives as long as the fixture.
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Cut the log file to `len` bytes, simulating an interrupted write.
    pub fn truncate_to(&self, len: u64) {
        OpenOptions::new()
            .write(true)
            .open(&self.log_path)
            .expect("Failed to open log for truncation")
            .set_len(len)
            .expect("Failed to truncate log");
    }
}

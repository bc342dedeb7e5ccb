//! Offline playback of a persisted log.

use super::overlay::draw_overlay;
use super::render::ReviewRenderer;
use super::replay::replay;
use crate::error::{Error, Result};
use crate::io::episode_log::LogReader;
use crate::io::export::DutyExporter;
use crate::kinematics::KinematicsConverter;

/// What a playback run covered.
#[derive(Debug, Clone, Default)]
pub struct PlaybackSummary {
    /// Episodes replayed in full
    pub episodes: usize,
    /// Steps replayed
    pub steps: usize,
    /// Sum of rewards over replayed steps
    pub total_reward: f64,
    /// Duty rows exported
    pub rows_exported: usize,
    /// Corruption that ended playback early, if any
    pub corruption: Option<String>,
}

impl PlaybackSummary {
    /// Whether every record in the log was readable.
    pub fn is_clean(&self) -> bool {
        self.corruption.is_none()
    }
}

/// Replay every episode of `reader` through `renderer`.
///
/// Corrupt data ends playback and is reported in the summary; the
/// episodes before it have already been rendered and exported. I/O
/// failures and renderer or export errors are returned.
pub fn play_log<R: ReviewRenderer>(
    reader: &mut LogReader,
    converter: &KinematicsConverter,
    renderer: &mut R,
    mut exporter: Option<&mut DutyExporter>,
    overlay: bool,
) -> Result<PlaybackSummary> {
    let mut summary = PlaybackSummary::default();

    for episode in reader.read_all() {
        let episode = match episode {
            Ok(episode) => episode,
            Err(Error::LogCorruption {
                offset,
                records_read,
                reason,
            }) => {
                log::error!(
                    "Playback: Stopping after {} episodes, corrupt record at byte {}: {}",
                    records_read,
                    offset,
                    reason
                );
                summary.corruption = Some(format!("byte {}: {}", offset, reason));
                break;
            }
            Err(e) => return Err(e),
        };

        renderer.begin_episode(summary.episodes, episode.len())?;
        for step in replay(&episode.steps, converter) {
            let canvas = overlay.then(|| draw_overlay(&step.step.frame, step.linear, step.angular));
            renderer.render(&step, canvas.as_ref())?;
            summary.steps += 1;
            summary.total_reward += step.step.reward;
        }

        if let Some(exporter) = exporter.as_deref_mut() {
            summary.rows_exported += exporter.write_episode(&episode, converter)?;
        }
        summary.episodes += 1;
    }

    log::info!(
        "Playback: {} episodes, {} steps, total reward {:.2}",
        summary.episodes,
        summary.steps,
        summary.total_reward
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Frame;
    use crate::io::episode_log::LogTestFixture;
    use crate::review::replay::ReplayStep;
    use crate::kinematics::WheelDuty;
    use std::fs;

    #[derive(Default)]
    struct DutyCollector {
        duties: Vec<WheelDuty>,
        episodes: usize,
    }

    impl ReviewRenderer for DutyCollector {
        fn begin_episode(&mut self, _episode: usize, _steps: usize) -> Result<()> {
            self.episodes += 1;
            Ok(())
        }

        fn render(&mut self, step: &ReplayStep<'_>, _canvas: Option<&Frame>) -> Result<()> {
            self.duties.push(step.duty);
            Ok(())
        }
    }

    #[test]
    fn test_play_clean_log() {
        let fixture = LogTestFixture::with_episodes(&[2, 3]);
        let converter = KinematicsConverter::default();
        let mut reader = LogReader::open(fixture.path()).unwrap();
        let mut renderer = DutyCollector::default();

        let summary = play_log(&mut reader, &converter, &mut renderer, None, false).unwrap();

        assert!(summary.is_clean());
        assert_eq!(summary.episodes, 2);
        assert_eq!(summary.steps, 5);
        assert_eq!(renderer.episodes, 2);
        assert_eq!(renderer.duties.len(), 5);
    }

    #[test]
    fn test_play_corrupt_log_reports_and_stops() {
        let fixture = LogTestFixture::with_episodes(&[2, 3]);
        let len = fs::metadata(fixture.path()).unwrap().len();
        fixture.truncate_to(len - 1);

        let converter = KinematicsConverter::default();
        let mut reader = LogReader::open(fixture.path()).unwrap();
        let mut renderer = DutyCollector::default();

        let summary = play_log(&mut reader, &converter, &mut renderer, None, true).unwrap();

        assert!(!summary.is_clean());
        assert_eq!(summary.episodes, 1);
        assert_eq!(summary.steps, 2);
    }

    #[test]
    fn test_play_exports_rows() {
        let fixture = LogTestFixture::with_episodes(&[4, 1]);
        let converter = KinematicsConverter::default();
        let mut reader = LogReader::open(fixture.path()).unwrap();
        let mut renderer = DutyCollector::default();
        let mut exporter = DutyExporter::open(fixture.dir().join("duty.csv")).unwrap();

        let summary =
            play_log(&mut reader, &converter, &mut renderer, Some(&mut exporter), false).unwrap();

        assert_eq!(summary.rows_exported, 5);
        assert_eq!(exporter.rows_written(), 5);
    }
}

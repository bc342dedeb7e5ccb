//! Offline playback against persisted logs, including damaged ones.

use approx::assert_relative_eq;
use smriti::{
    DutyExporter, Episode, Error, Frame, KinematicsConverter, KinematicsParameters, LogReader,
    LogWriter, Metadata, ReplayStep, Result, ReviewRenderer, Step, WheelDuty, play_log, replay,
};
use std::fs::{self, OpenOptions};
use std::path::Path;
use tempfile::TempDir;

fn episode(commands: &[(f64, f64)]) -> Episode {
    Episode::new(
        commands
            .iter()
            .enumerate()
            .map(|(i, &(v, w))| {
                Step::new(
                    Frame::filled(5, 5, [10, 20, 30]),
                    vec![v, w],
                    i as f64,
                    i + 1 == commands.len(),
                    Metadata::new(),
                )
            })
            .collect(),
    )
}

fn write_log(path: &Path, episodes: &[Episode]) {
    let mut writer = LogWriter::open(path).unwrap();
    for e in episodes {
        writer.write_episode(e).unwrap();
    }
    writer.close().unwrap();
}

#[derive(Default)]
struct Collect(Vec<WheelDuty>);

impl ReviewRenderer for Collect {
    fn render(&mut self, step: &ReplayStep<'_>, _canvas: Option<&Frame>) -> Result<()> {
        self.0.push(step.duty);
        Ok(())
    }
}

#[test]
fn truncated_log_yields_prefix_then_corruption() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("cut.log");
    let episodes = vec![
        episode(&[(0.1, 0.0), (0.2, 0.0)]),
        episode(&[(0.3, 0.1)]),
        episode(&[(0.4, -0.2), (0.5, 0.0), (0.6, 0.3)]),
    ];
    write_log(&log_path, &episodes);

    let len = fs::metadata(&log_path).unwrap().len();
    OpenOptions::new()
        .write(true)
        .open(&log_path)
        .unwrap()
        .set_len(len - 10)
        .unwrap();

    let mut reader = LogReader::open(&log_path).unwrap();
    let results: Vec<_> = reader.read_all().collect();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap(), &episodes[0]);
    assert_eq!(results[1].as_ref().unwrap(), &episodes[1]);
    assert!(matches!(
        results[2],
        Err(Error::LogCorruption { records_read: 2, .. })
    ));
    assert_eq!(reader.records_read(), 2);
}

#[test]
fn reopening_restarts_playback() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("again.log");
    write_log(&log_path, &[episode(&[(0.3, 0.0)]), episode(&[(0.2, 0.2)])]);

    for _ in 0..2 {
        let mut reader = LogReader::open(&log_path).unwrap();
        assert_eq!(reader.read_all().count(), 2);
        reader.close();
    }
}

#[test]
fn playback_matches_live_conversion() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("play.log");
    let recorded = episode(&[(0.3, 0.0), (0.0, 1.0), (2.0, 0.0)]);
    write_log(&log_path, std::slice::from_ref(&recorded));

    let converter = KinematicsConverter::new(KinematicsParameters::default()).unwrap();
    let live: Vec<WheelDuty> = replay(&recorded.steps, &converter).map(|s| s.duty).collect();

    let mut reader = LogReader::open(&log_path).unwrap();
    let mut collected = Collect::default();
    let summary = play_log(&mut reader, &converter, &mut collected, None, true).unwrap();

    assert!(summary.is_clean());
    assert_eq!(collected.0, live);
    assert_relative_eq!(collected.0[0].left, 0.3 / 0.0318 / 27.0, epsilon = 1e-12);
    // Saturated command stays within the duty limit
    assert_relative_eq!(collected.0[2].left, 1.0);
    assert_relative_eq!(collected.0[2].right, 1.0);
}

#[test]
fn playback_appends_duty_rows_to_csv() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("rows.log");
    let csv_path = temp_dir.path().join("duty.csv");
    write_log(&log_path, &[episode(&[(0.1, 0.0), (0.2, 0.0)]), episode(&[(0.3, 0.0)])]);

    let converter = KinematicsConverter::default();
    for _ in 0..2 {
        let mut reader = LogReader::open(&log_path).unwrap();
        let mut exporter = DutyExporter::open(&csv_path).unwrap();
        play_log(&mut reader, &converter, &mut Collect::default(), Some(&mut exporter), false)
            .unwrap();
        exporter.flush().unwrap();
    }

    let contents = fs::read_to_string(&csv_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next(),
        Some("linear_command,angular_command,left_duty,right_duty")
    );
    // Header written once, rows appended on every run
    assert_eq!(lines.count(), 6);
}

#[test]
fn empty_file_has_no_episodes() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("empty.log");
    fs::write(&log_path, b"").unwrap();

    let mut reader = LogReader::open(&log_path).unwrap();
    assert!(reader.next_episode().unwrap().is_none());
}

#[test]
fn missing_file_is_an_io_error() {
    let temp_dir = TempDir::new().unwrap();
    assert!(matches!(
        LogReader::open(temp_dir.path().join("nope.log")),
        Err(Error::Io(_))
    ));
}

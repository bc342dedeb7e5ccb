//! Duty cycle side channel for distribution analysis.
//!
//! One CSV row per step with the driving command and the duty cycles it
//! maps to. The file is opened in append mode and never rewritten; the
//! header row is written only when the file is new.
//!
//! ```text
//! linear_command,angular_command,left_duty,right_duty
//! 0.3,0.0,0.34940600978336826,0.34940600978336826
//! ```

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::types::Episode;
use crate::error::Result;
use crate::kinematics::{KinematicsConverter, WheelDuty};

/// One exported row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DutyRow {
    pub linear_command: f64,
    pub angular_command: f64,
    pub left_duty: f64,
    pub right_duty: f64,
}

impl DutyRow {
    pub fn new(linear: f64, angular: f64, duty: WheelDuty) -> Self {
        Self {
            linear_command: linear,
            angular_command: angular,
            left_duty: duty.left,
            right_duty: duty.right,
        }
    }
}

/// Append-only CSV writer for [`DutyRow`]s.
pub struct DutyExporter {
    writer: csv::Writer<File>,
    path: PathBuf,
    rows_written: u64,
}

impl DutyExporter {
    /// Open (or create) the export file for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().append(true).create(true).open(&path)?;
        let is_new = file.metadata()?.len() == 0;

        let writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);

        log::debug!(
            "DutyExporter: {} {}",
            if is_new { "Created" } else { "Appending to" },
            path.display()
        );

        Ok(Self {
            writer,
            path,
            rows_written: 0,
        })
    }

    /// Append one row.
    pub fn write_row(&mut self, row: &DutyRow) -> Result<()> {
        self.writer.serialize(row)?;
        self.rows_written += 1;
        Ok(())
    }

    /// Append one row computed from a command.
    pub fn write_step(
        &mut self,
        linear: f64,
        angular: f64,
        converter: &KinematicsConverter,
    ) -> Result<()> {
        let duty = converter.convert(linear, angular);
        self.write_row(&DutyRow::new(linear, angular, duty))
    }

    /// Append one row per step of an episode, then flush.
    ///
    /// Steps with a malformed action are skipped.
    pub fn write_episode(&mut self, episode: &Episode, converter: &KinematicsConverter) -> Result<usize> {
        let mut rows = 0;
        for step in episode {
            if let Some((linear, angular)) = step.command() {
                self.write_step(linear, angular, converter)?;
                rows += 1;
            }
        }
        self.flush()?;
        Ok(rows)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::episode_log::LogTestFixture;
    use approx::assert_relative_eq;
    use std::fs;
    use tempfile::TempDir;

    fn read_rows(path: &Path) -> Vec<DutyRow> {
        let mut reader = csv::Reader::from_path(path).unwrap();
        reader.deserialize().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn test_header_and_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("duty.csv");
        let converter = KinematicsConverter::default();

        let mut exporter = DutyExporter::open(&path).unwrap();
        exporter.write_step(0.3, 0.0, &converter).unwrap();
        exporter.flush().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("linear_command,angular_command,left_duty,right_duty\n"));

        let rows = read_rows(&path);
        assert_eq!(rows.len(), 1);
        assert_relative_eq!(rows[0].left_duty, 0.3 / 0.0318 / 27.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reopen_appends_without_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("duty.csv");
        let converter = KinematicsConverter::default();

        for _ in 0..2 {
            let mut exporter = DutyExporter::open(&path).unwrap();
            exporter.write_step(0.1, 0.2, &converter).unwrap();
        }

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("linear_command").count(), 1);
        assert_eq!(read_rows(&path).len(), 2);
    }

    #[test]
    fn test_episode_rows_match_steps() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("duty.csv");
        let converter = KinematicsConverter::default();
        let episode = LogTestFixture::episode(6);

        let mut exporter = DutyExporter::open(&path).unwrap();
        assert_eq!(exporter.write_episode(&episode, &converter).unwrap(), 6);
        assert_eq!(exporter.rows_written(), 6);

        let rows = read_rows(&path);
        for (row, step) in rows.iter().zip(&episode) {
            let (v, w) = step.command().unwrap();
            assert_eq!(*row, DutyRow::new(v, w, converter.convert(v, w)));
        }
    }
}

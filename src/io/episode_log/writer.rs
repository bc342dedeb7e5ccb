//! Episode log writer.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::format::{
    HEADER_SIZE, LENGTH_PREFIX_SIZE, LogHeader, MAX_RECORD_BYTES, RecordInfo, encode_record,
};
use crate::core::types::Episode;
use crate::error::{Error, Result};

/// Writer behaviour knobs.
#[derive(Debug, Clone, Copy)]
pub struct WriterOptions {
    /// Call `sync_data` after every record
    pub sync_on_write: bool,
    /// Refuse episodes that encode larger than this
    pub max_record_bytes: u64,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            sync_on_write: false,
            max_record_bytes: MAX_RECORD_BYTES,
        }
    }
}

/// Appends committed episodes to a log file.
///
/// The file is opened in append mode and created if absent. Each call to
/// [`write_episode`](Self::write_episode) lands exactly one record or
/// nothing at all. The handle is released on drop, so early returns and
/// panics cannot leak it; [`close`](Self::close) additionally reports
/// flush errors.
///
/// # Example
///
/// ```ignore
/// use smriti::io::episode_log::LogWriter;
///
/// let mut writer = LogWriter::open("training_data.log")?;
/// let info = writer.write_episode(&episode)?;
/// println!("{} steps in {} bytes", info.steps, info.bytes);
/// writer.close()?;
/// ```
pub struct LogWriter {
    file: File,
    path: PathBuf,
    options: WriterOptions,
    records_written: u64,
    steps_written: u64,
}

impl LogWriter {
    /// Open a log for appending with default options.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, WriterOptions::default())
    }

    /// Open a log for appending.
    ///
    /// An empty file gets a fresh header. A non-empty file must already
    /// start with a valid header, and its record boundaries are walked so
    /// new records never land behind unreadable bytes:
    ///
    /// - a torn last record (interrupted write) is cut off, with a warning
    ///   naming the bytes dropped
    /// - a length prefix that no writer could have produced (zero or above
    ///   `max_record_bytes`) fails with [`Error::LogCorruption`] and the
    ///   file is left as is
    pub fn open_with(path: impl AsRef<Path>, options: WriterOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)?;

        let len = file.metadata()?.len();
        if len == 0 {
            file.write_all(&LogHeader::new().to_bytes())?;
            file.flush()?;
            log::info!("LogWriter: Created episode log {}", path.display());
        } else {
            verify_header(&mut file, len)?;
            let end = trim_torn_tail(&mut file, &path, len, options.max_record_bytes)?;
            log::info!(
                "LogWriter: Appending to episode log {} ({} bytes)",
                path.display(),
                end
            );
        }

        Ok(Self {
            file,
            path,
            options,
            records_written: 0,
            steps_written: 0,
        })
    }

    /// Serialize an episode and append it as one record.
    ///
    /// Encoding failures return [`Error::Serialization`] before anything is
    /// written. If the write itself fails, the file is truncated back to its
    /// previous length so no partial record remains.
    pub fn write_episode(&mut self, episode: &Episode) -> Result<RecordInfo> {
        let record = encode_record(episode, self.options.max_record_bytes)?;
        let offset = self.file.metadata()?.len();

        if let Err(e) = self.append(&record) {
            log::error!(
                "LogWriter: Write of {} bytes to {} failed: {}",
                record.len(),
                self.path.display(),
                e
            );
            if let Err(te) = self.file.set_len(offset) {
                log::error!(
                    "LogWriter: Could not roll back partial record at byte {}: {}",
                    offset,
                    te
                );
            }
            return Err(e);
        }

        self.records_written += 1;
        self.steps_written += episode.len() as u64;

        log::debug!(
            "LogWriter: Record {} at byte {} ({} steps, {} bytes)",
            self.records_written,
            offset,
            episode.len(),
            record.len()
        );

        Ok(RecordInfo {
            path: self.path.clone(),
            offset,
            bytes: record.len() as u64,
            steps: episode.len(),
        })
    }

    fn append(&mut self, record: &[u8]) -> Result<()> {
        self.file.write_all(record)?;
        self.file.flush()?;
        if self.options.sync_on_write {
            self.file.sync_data()?;
        }
        Ok(())
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records appended through this writer.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Steps appended through this writer.
    pub fn steps_written(&self) -> u64 {
        self.steps_written
    }

    /// Flush and release the file.
    pub fn close(mut self) -> Result<()> {
        self.file.flush()?;
        self.file.sync_all()?;
        log::info!(
            "LogWriter: Closed {} ({} records, {} steps this session)",
            self.path.display(),
            self.records_written,
            self.steps_written
        );
        Ok(())
    }
}

fn verify_header(file: &mut File, len: u64) -> Result<()> {
    let corrupt = |reason: String| Error::LogCorruption {
        offset: 0,
        records_read: 0,
        reason,
    };

    if len < HEADER_SIZE as u64 {
        return Err(corrupt(format!(
            "file is {} bytes, shorter than the {}-byte header",
            len, HEADER_SIZE
        )));
    }

    let mut bytes = [0u8; HEADER_SIZE];
    file.seek(SeekFrom::Start(0))?;
    file.read_exact(&mut bytes)?;
    LogHeader::from_bytes(&bytes).check().map_err(corrupt)
}

/// Walk the length prefixes after the header and cut a torn last record.
///
/// Returns the file length after trimming.
fn trim_torn_tail(file: &mut File, path: &Path, len: u64, max_record_bytes: u64) -> Result<u64> {
    let prefix_size = LENGTH_PREFIX_SIZE as u64;
    let mut offset = HEADER_SIZE as u64;
    let mut records = 0u64;

    let boundary = loop {
        if offset == len {
            return Ok(len);
        }
        let remaining = len - offset;
        if remaining < prefix_size {
            break offset;
        }

        let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(&mut prefix)?;
        let record_len = u32::from_le_bytes(prefix) as u64;

        if record_len == 0 || record_len > max_record_bytes {
            return Err(Error::LogCorruption {
                offset,
                records_read: records,
                reason: format!(
                    "record length {} is outside 1..={}, refusing to append",
                    record_len, max_record_bytes
                ),
            });
        }
        if record_len > remaining - prefix_size {
            break offset;
        }

        offset += prefix_size + record_len;
        records += 1;
    };

    log::warn!(
        "LogWriter: {} ends in a torn record at byte {}, dropping {} bytes after {} records",
        path.display(),
        boundary,
        len - boundary,
        records
    );
    file.set_len(boundary)?;
    Ok(boundary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::episode_log::{LogReader, LogTestFixture};
    use std::fs::{self, OpenOptions};
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_file_with_header() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("new.log");

        let writer = LogWriter::open(&log_path).unwrap();
        writer.close().unwrap();

        let bytes = fs::read(&log_path).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE);
        assert_eq!(&bytes[..4], b"SMRT");
    }

    #[test]
    fn test_reopen_appends_without_second_header() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("append.log");
        let episode = LogTestFixture::episode(3);

        let mut writer = LogWriter::open(&log_path).unwrap();
        let first = writer.write_episode(&episode).unwrap();
        writer.close().unwrap();

        let mut writer = LogWriter::open(&log_path).unwrap();
        let second = writer.write_episode(&episode).unwrap();
        writer.close().unwrap();

        assert_eq!(first.offset, HEADER_SIZE as u64);
        assert_eq!(second.offset, first.offset + first.bytes);
        let len = fs::metadata(&log_path).unwrap().len();
        assert_eq!(len, second.offset + second.bytes);
    }

    #[test]
    fn test_serialization_failure_leaves_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("untouched.log");

        let mut writer = LogWriter::open(&log_path).unwrap();
        writer.write_episode(&LogTestFixture::episode(2)).unwrap();
        let before = fs::read(&log_path).unwrap();

        let mut bad = LogTestFixture::episode(2);
        bad.steps[1].action.push(9.0);
        let err = writer.write_episode(&bad).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));

        assert_eq!(fs::read(&log_path).unwrap(), before);
        assert_eq!(writer.records_written(), 1);
    }

    #[test]
    fn test_oversized_record_refused() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("small.log");

        let options = WriterOptions {
            max_record_bytes: 16,
            ..Default::default()
        };
        let mut writer = LogWriter::open_with(&log_path, options).unwrap();
        let err = writer.write_episode(&LogTestFixture::episode(4)).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert_eq!(fs::metadata(&log_path).unwrap().len(), HEADER_SIZE as u64);
    }

    #[test]
    fn test_open_rejects_foreign_file() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("foreign.log");
        fs::write(&log_path, b"not an episode log").unwrap();

        let result = LogWriter::open(&log_path);
        assert!(matches!(result, Err(Error::LogCorruption { offset: 0, .. })));
        // The foreign file is not modified
        assert_eq!(fs::read(&log_path).unwrap(), b"not an episode log");
    }

    #[test]
    fn test_reopen_cuts_torn_record_before_appending() {
        let fixture = LogTestFixture::with_episodes(&[2, 3]);
        let first_end = {
            let mut reader = LogReader::open(fixture.path()).unwrap();
            reader.next_episode().unwrap().unwrap();
            reader.offset()
        };
        let len = fs::metadata(fixture.path()).unwrap().len();
        fixture.truncate_to(len - 5);

        let committed = LogTestFixture::episode(4);
        let mut writer = LogWriter::open(fixture.path()).unwrap();
        let info = writer.write_episode(&committed).unwrap();
        writer.close().unwrap();

        assert_eq!(info.offset, first_end);
        assert_eq!(fs::metadata(fixture.path()).unwrap().len(), info.offset + info.bytes);

        // The committed episode is the last readable record
        let mut reader = LogReader::open(fixture.path()).unwrap();
        let episodes: Vec<Episode> = reader.read_all().map(|e| e.unwrap()).collect();
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0], fixture.episodes()[0]);
        assert_eq!(episodes[1], committed);
    }

    #[test]
    fn test_reopen_cuts_partial_length_prefix() {
        let fixture = LogTestFixture::with_episodes(&[1]);
        let len = fs::metadata(fixture.path()).unwrap().len();
        let mut file = OpenOptions::new().append(true).open(fixture.path()).unwrap();
        file.write_all(&[9, 0]).unwrap();
        drop(file);

        LogWriter::open(fixture.path()).unwrap().close().unwrap();
        assert_eq!(fs::metadata(fixture.path()).unwrap().len(), len);
    }

    #[test]
    fn test_reopen_refuses_impossible_record_length() {
        let fixture = LogTestFixture::with_episodes(&[1]);
        let mut file = OpenOptions::new().append(true).open(fixture.path()).unwrap();
        file.write_all(&u32::MAX.to_le_bytes()).unwrap();
        file.write_all(&[0u8; 16]).unwrap();
        drop(file);
        let before = fs::read(fixture.path()).unwrap();

        let result = LogWriter::open(fixture.path());
        assert!(matches!(
            result,
            Err(Error::LogCorruption { records_read: 1, .. })
        ));
        assert_eq!(fs::read(fixture.path()).unwrap(), before);
    }

    #[test]
    fn test_open_fails_for_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("missing").join("x.log");
        assert!(matches!(LogWriter::open(&log_path), Err(Error::Io(_))));
    }

    #[test]
    fn test_counts() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("counts.log");

        let mut writer = LogWriter::open(&log_path).unwrap();
        writer.write_episode(&LogTestFixture::episode(5)).unwrap();
        writer.write_episode(&LogTestFixture::episode(2)).unwrap();

        assert_eq!(writer.records_written(), 2);
        assert_eq!(writer.steps_written(), 7);
        assert_eq!(writer.path(), log_path.as_path());
    }
}

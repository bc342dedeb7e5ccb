//! Streaming episode log reader.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};

use super::format::{
    HEADER_SIZE, LENGTH_PREFIX_SIZE, LogHeader, MAX_RECORD_BYTES, decode_record,
};
use crate::core::types::Episode;
use crate::error::{Error, Result};

/// Reads episodes front to back from a log file.
///
/// Records are decoded lazily, one per call. End of file at a record
/// boundary ends the sequence normally. Anything malformed yields a single
/// [`Error::LogCorruption`] and the reader stops; episodes returned before
/// the fault stay valid. The reader never writes to the file.
///
/// To replay again, open the file again.
///
/// # Example
///
/// ```ignore
/// use smriti::io::episode_log::LogReader;
///
/// let mut reader = LogReader::open("training_data.log")?;
/// while let Some(episode) = reader.next_episode()? {
///     println!("{} steps, reward {:.2}", episode.len(), episode.total_reward());
/// }
/// ```
pub struct LogReader {
    reader: BufReader<File>,
    path: PathBuf,
    offset: u64,
    records_read: u64,
    max_record_bytes: u64,
    finished: bool,
}

impl LogReader {
    /// Open a log for playback.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, MAX_RECORD_BYTES)
    }

    /// Open a log, treating records above `max_record_bytes` as corrupt.
    pub fn open_with(path: impl AsRef<Path>, max_record_bytes: u64) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let len = file.metadata()?.len();

        let mut reader = Self {
            reader: BufReader::new(file),
            path,
            offset: 0,
            records_read: 0,
            max_record_bytes,
            finished: false,
        };

        if len == 0 {
            log::debug!("LogReader: {} is empty", reader.path.display());
            reader.finished = true;
            return Ok(reader);
        }

        let mut header_bytes = [0u8; HEADER_SIZE];
        let n = read_fully(&mut reader.reader, &mut header_bytes)?;
        if n < HEADER_SIZE {
            return Err(reader.corrupt(
                0,
                format!("file is {} bytes, shorter than the {}-byte header", n, HEADER_SIZE),
            ));
        }
        if let Err(reason) = LogHeader::from_bytes(&header_bytes).check() {
            return Err(reader.corrupt(0, reason));
        }
        reader.offset = HEADER_SIZE as u64;

        log::debug!(
            "LogReader: Opened {} ({} bytes)",
            reader.path.display(),
            len
        );
        Ok(reader)
    }

    /// Decode the next episode.
    ///
    /// Returns `Ok(None)` at end of stream and after a previous fault.
    pub fn next_episode(&mut self) -> Result<Option<Episode>> {
        if self.finished {
            return Ok(None);
        }

        let start = self.offset;

        let mut len_bytes = [0u8; LENGTH_PREFIX_SIZE];
        let n = self.read_or_stop(&mut len_bytes)?;
        if n == 0 {
            self.finished = true;
            log::debug!(
                "LogReader: End of {} after {} records",
                self.path.display(),
                self.records_read
            );
            return Ok(None);
        }
        if n < LENGTH_PREFIX_SIZE {
            return Err(self.corrupt(
                start,
                format!("truncated length prefix ({} of {} bytes)", n, LENGTH_PREFIX_SIZE),
            ));
        }

        let len = u32::from_le_bytes(len_bytes) as u64;
        if len > self.max_record_bytes {
            return Err(self.corrupt(
                start,
                format!("record length {} exceeds limit {}", len, self.max_record_bytes),
            ));
        }

        // Grows with the bytes actually present, not with the claimed length
        let mut payload = Vec::new();
        let n = (&mut self.reader)
            .take(len)
            .read_to_end(&mut payload)
            .inspect_err(|_| self.finished = true)?;
        if (n as u64) < len {
            return Err(self.corrupt(
                start,
                format!("truncated record ({} of {} payload bytes)", n, len),
            ));
        }

        let episode = match decode_record(&payload) {
            Ok(episode) => episode,
            Err(reason) => return Err(self.corrupt(start, reason)),
        };

        self.offset = start + LENGTH_PREFIX_SIZE as u64 + len;
        self.records_read += 1;
        Ok(Some(episode))
    }

    /// Lazy sequence of the remaining episodes.
    pub fn read_all(&mut self) -> Episodes<'_> {
        Episodes { reader: self }
    }

    /// Episodes decoded so far.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Byte offset of the next record.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the sequence has ended (cleanly or not).
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Release the file.
    pub fn close(self) {
        log::debug!(
            "LogReader: Closed {} after {} records",
            self.path.display(),
            self.records_read
        );
    }

    fn read_or_stop(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(read_fully(&mut self.reader, buf).inspect_err(|_| self.finished = true)?)
    }

    fn corrupt(&mut self, offset: u64, reason: String) -> Error {
        self.finished = true;
        log::warn!(
            "LogReader: Corrupt record in {} at byte {} after {} records: {}",
            self.path.display(),
            offset,
            self.records_read,
            reason
        );
        Error::LogCorruption {
            offset,
            records_read: self.records_read,
            reason,
        }
    }
}

/// Iterator over the episodes of a [`LogReader`].
///
/// Yields at most one error, after which it is exhausted.
pub struct Episodes<'a> {
    reader: &'a mut LogReader,
}

impl Iterator for Episodes<'_> {
    type Item = Result<Episode>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_episode().transpose()
    }
}

impl std::iter::FusedIterator for Episodes<'_> {}

/// Fill `buf` until it is full or the stream ends; returns bytes read.
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

//! Append-only episode log.
//!
//! Committed episodes are stored one per record so a log can be replayed
//! long after the recording session ended.
//!
//! # File Format
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │ Header (8 bytes)                                 │
//! │ - Magic: "SMRT" (4 bytes)                        │
//! │ - Version: u16 LE                                │
//! │ - Flags: u16 LE                                  │
//! ├──────────────────────────────────────────────────┤
//! │ Record Stream                                    │
//! │ [len:u32 LE][postcard Episode]...                │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! Records are self-contained; there is no index and no checksum. A
//! reader stops cleanly at end of file and reports anything malformed
//! after the last complete record as corruption.
//!
//! # Example
//!
//! ```ignore
//! use smriti::io::episode_log::{LogReader, LogWriter};
//!
//! let mut writer = LogWriter::open("training_data.log")?;
//! writer.write_episode(&episode)?;
//! writer.close()?;
//!
//! let mut reader = LogReader::open("training_data.log")?;
//! for episode in reader.read_all() {
//!     println!("{} steps", episode?.len());
//! }
//! ```

mod format;
mod reader;
mod writer;

pub use format::{
    FORMAT_VERSION, HEADER_SIZE, LOG_MAGIC, LogHeader, MAX_RECORD_BYTES, RecordInfo,
};
pub use reader::{Episodes, LogReader};
pub use writer::{LogWriter, WriterOptions};

#[cfg(test)]
mod test_fixtures;

#[cfg(test)]
pub use test_fixtures::LogTestFixture;

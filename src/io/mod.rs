//! I/O and persistence layer.
//!
//! # Contents
//!
//! - [`episode_log`]: Append-only episode log (writer, streaming reader)
//! - [`export`]: Row-oriented duty cycle export for external analysis
//! - [`frames`]: PNG dumps of rendered review frames

pub mod export;
pub mod frames;
pub mod episode_log;

pub use export::{DutyExporter, DutyRow};
pub use frames::FrameDumper;
pub use episode_log::{Episodes, LogReader, LogWriter, RecordInfo, WriterOptions};

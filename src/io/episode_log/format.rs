//! Episode log framing and record encoding.

use std::path::PathBuf;

use crate::core::types::{ACTION_DIM, Episode};
use crate::error::{Error, Result};

/// Magic bytes at start of an episode log.
pub const LOG_MAGIC: [u8; 4] = *b"SMRT";

/// Current log format version.
pub const FORMAT_VERSION: u16 = 1;

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 8;

/// Size of the per-record length prefix in bytes.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Default upper bound for one encoded episode (1 GiB).
pub const MAX_RECORD_BYTES: u64 = 1 << 30;

/// Fixed-size file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogHeader {
    /// Magic bytes: "SMRT"
    pub magic: [u8; 4],
    /// File format version
    pub version: u16,
    /// Feature flags (none defined)
    pub flags: u16,
}

impl LogHeader {
    pub fn new() -> Self {
        Self {
            magic: LOG_MAGIC,
            version: FORMAT_VERSION,
            flags: 0,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[..4].copy_from_slice(&self.magic);
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.flags.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            version: u16::from_le_bytes([bytes[4], bytes[5]]),
            flags: u16::from_le_bytes([bytes[6], bytes[7]]),
        }
    }

    /// Check magic and version; returns the reason on mismatch.
    pub fn check(&self) -> std::result::Result<(), String> {
        if self.magic != LOG_MAGIC {
            return Err(format!("invalid magic bytes {:?}", self.magic));
        }
        if self.version != FORMAT_VERSION {
            return Err(format!(
                "unsupported format version {} (expected {})",
                self.version, FORMAT_VERSION
            ));
        }
        Ok(())
    }
}

impl Default for LogHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Where and how large a written record is.
#[derive(Debug, Clone)]
pub struct RecordInfo {
    /// Log file the record went to
    pub path: PathBuf,
    /// Byte offset of the record's length prefix
    pub offset: u64,
    /// Total bytes written, including the length prefix
    pub bytes: u64,
    /// Steps in the episode
    pub steps: usize,
}

/// Encode an episode into a complete framed record.
///
/// Every check happens before any byte reaches the file.
pub(crate) fn encode_record(episode: &Episode, max_record_bytes: u64) -> Result<Vec<u8>> {
    for (index, step) in episode.steps.iter().enumerate() {
        if !step.has_valid_action() {
            return Err(Error::Serialization(format!(
                "step {} has {} action components, expected {}",
                index,
                step.action.len(),
                ACTION_DIM
            )));
        }
        if !step.frame.is_consistent() {
            return Err(Error::Serialization(format!(
                "step {} frame is {}x{}x3 but holds {} bytes",
                index,
                step.frame.height,
                step.frame.width,
                step.frame.data.len()
            )));
        }
    }

    let payload = postcard::to_allocvec(episode)?;
    let len = payload.len() as u64;
    if len > max_record_bytes || len > u32::MAX as u64 {
        return Err(Error::Serialization(format!(
            "episode encodes to {} bytes, limit is {}",
            len,
            max_record_bytes.min(u32::MAX as u64)
        )));
    }

    let mut record = Vec::with_capacity(LENGTH_PREFIX_SIZE + payload.len());
    record.extend_from_slice(&(len as u32).to_le_bytes());
    record.extend_from_slice(&payload);
    Ok(record)
}

/// Decode one record payload; returns the reason on failure.
pub(crate) fn decode_record(payload: &[u8]) -> std::result::Result<Episode, String> {
    let (episode, rest) = postcard::take_from_bytes::<Episode>(payload)
        .map_err(|e| format!("undecodable episode: {}", e))?;
    if !rest.is_empty() {
        return Err(format!("{} trailing bytes after episode", rest.len()));
    }
    for (index, step) in episode.steps.iter().enumerate() {
        if !step.has_valid_action() {
            return Err(format!(
                "step {} has {} action components, expected {}",
                index,
                step.action.len(),
                ACTION_DIM
            ));
        }
        if !step.frame.is_consistent() {
            return Err(format!(
                "step {} frame is {}x{}x3 but holds {} bytes",
                index,
                step.frame.height,
                step.frame.width,
                step.frame.data.len()
            ));
        }
    }
    Ok(episode)
}

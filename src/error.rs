//! Error types for Smriti

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Smriti error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Step rejected by the episode buffer (wrong action arity)
    #[error("Invalid step: action has {actual} components, expected {expected}")]
    InvalidStep {
        /// Required number of action components
        expected: usize,
        /// Number of components actually supplied
        actual: usize,
    },

    /// Episode could not be encoded; nothing was written
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Malformed bytes in a log file
    #[error("Log corruption at byte {offset} after {records_read} records: {reason}")]
    LogCorruption {
        /// Byte offset where the bad record starts
        offset: u64,
        /// Number of well-formed records read before the fault
        records_read: u64,
        /// Description of the fault
        reason: String,
    },

    /// I/O error (including failure to open a file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure writing the analysis export or frame dumps
    #[error("Export error: {0}")]
    Export(String),

    /// Operator input ended while a review decision was pending
    #[error("Operator input closed before a review decision was made")]
    InputClosed,
}

impl From<postcard::Error> for Error {
    fn from(e: postcard::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Export(e.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Export(e.to_string())
    }
}

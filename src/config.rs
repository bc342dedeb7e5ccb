//! Configuration for Smriti
//!
//! Loads configuration from a TOML file. Every section and field has a
//! default, so a partial file (or none at all) is valid.

use crate::error::{Error, Result};
use crate::io::episode_log::{MAX_RECORD_BYTES, WriterOptions};
use crate::kinematics::KinematicsParameters;
use crate::session::{DEFAULT_OUT_OF_BOUNDS_REWARD, InvalidStepPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub kinematics: KinematicsParameters,
    pub recording: RecordingConfig,
    pub review: ReviewConfig,
    pub logging: LoggingConfig,
}

/// Episode log settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Append-only episode log
    pub log_path: PathBuf,
    /// Handling of steps with the wrong action arity
    pub invalid_step: InvalidStepPolicy,
    /// Reward marking an out-of-bounds step; such steps are not recorded
    ///
    /// Omit the key to record every step.
    pub out_of_bounds_reward: Option<f64>,
    /// `sync_data` after every committed episode
    pub sync_on_write: bool,
    /// Largest encoded episode accepted by the writer and reader
    pub max_record_bytes: u64,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("training_data.log"),
            invalid_step: InvalidStepPolicy::Skip,
            out_of_bounds_reward: Some(DEFAULT_OUT_OF_BOUNDS_REWARD),
            sync_on_write: false,
            max_record_bytes: MAX_RECORD_BYTES,
        }
    }
}

/// Review and playback settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// CSV side channel receiving duty rows of committed/played episodes
    pub export_path: Option<PathBuf>,
    /// Pause between rendered steps
    pub frame_delay_ms: u64,
    /// Draw speed and steering bars on review frames
    pub overlay: bool,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            export_path: None,
            frame_delay_ms: 20,
            overlay: true,
        }
    }
}

impl ReviewConfig {
    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file
    ///
    /// # Example
    /// ```no_run
    /// use smriti::config::Config;
    ///
    /// let config = Config::load("smriti.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.kinematics.validate()?;

        if self.recording.max_record_bytes == 0 {
            return Err(Error::Config(
                "recording.max_record_bytes must be positive".to_string(),
            ));
        }
        if self.recording.max_record_bytes > u64::from(u32::MAX) {
            return Err(Error::Config(format!(
                "recording.max_record_bytes {} exceeds the 32-bit record length",
                self.recording.max_record_bytes
            )));
        }
        if let Some(reward) = self.recording.out_of_bounds_reward
            && !reward.is_finite()
        {
            return Err(Error::Config(format!(
                "recording.out_of_bounds_reward must be finite, got {}",
                reward
            )));
        }
        if self.recording.log_path.as_os_str().is_empty() {
            return Err(Error::Config("recording.log_path is empty".to_string()));
        }
        Ok(())
    }

    /// Writer settings from the `[recording]` section.
    pub fn writer_options(&self) -> WriterOptions {
        WriterOptions {
            sync_on_write: self.recording.sync_on_write,
            max_record_bytes: self.recording.max_record_bytes,
        }
    }
}

//! Smriti - Inspect and replay recorded driving episodes
//!
//! # Usage
//!
//! ```bash
//! # Per-episode summary of a log
//! smriti inspect training_data.log
//!
//! # Replay with telemetry, duty export and PNG frames
//! smriti playback training_data.log --export duty.csv --frames-dir frames/
//!
//! # Write a default configuration to edit
//! smriti init-config smriti.toml
//! ```
//!
//! Exits non-zero when a log contains a corrupt record; everything before
//! the corrupt record is still inspected or played back.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};

use smriti::config::Config;
use smriti::io::episode_log::LogReader;
use smriti::io::{DutyExporter, FrameDumper};
use smriti::kinematics::KinematicsConverter;
use smriti::review::{ConsoleRenderer, play_log};
use smriti::{Error, Result};

#[derive(Parser)]
#[command(name = "smriti")]
#[command(about = "Inspect and replay recorded driving episodes")]
struct Args {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize every episode in a log
    Inspect {
        /// Episode log file
        log: PathBuf,
    },

    /// Replay a log through the kinematics converter
    Playback {
        /// Episode log file
        log: PathBuf,

        /// Append duty cycle rows to this CSV file
        #[arg(long)]
        export: Option<PathBuf>,

        /// Write overlaid frames as PNG into this directory
        #[arg(long)]
        frames_dir: Option<PathBuf>,

        /// Pause between steps in milliseconds (overrides config)
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Write the default configuration to a file
    InitConfig {
        /// Destination TOML file
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .format(|buf, record| {
        writeln!(
            buf,
            "[{}] {} - {}",
            record.level(),
            record.target(),
            record.args()
        )
    })
    .init();

    match run(args.command, &config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns `false` when the log turned out to be corrupt.
fn run(command: Command, config: &Config) -> Result<bool> {
    match command {
        Command::Inspect { log } => inspect(&log, config),
        Command::Playback {
            log,
            export,
            frames_dir,
            delay_ms,
        } => playback(&log, export, frames_dir, delay_ms, config),
        Command::InitConfig { path } => {
            config.to_file(&path)?;
            println!("Wrote configuration to {}", path.display());
            Ok(true)
        }
    }
}

fn inspect(path: &Path, config: &Config) -> Result<bool> {
    let mut reader = LogReader::open_with(path, config.recording.max_record_bytes)?;

    println!("Log: {}", path.display());
    println!(
        "{:>7}  {:>6}  {:>10}  {:>9}  {:>10}",
        "EPISODE", "STEPS", "REWARD", "TERMINAL", "BYTES"
    );

    let mut episodes = 0usize;
    let mut steps = 0usize;
    let mut reward = 0.0;
    let mut start = reader.offset();

    loop {
        match reader.next_episode() {
            Ok(Some(episode)) => {
                let end = reader.offset();
                println!(
                    "{:>7}  {:>6}  {:>10.2}  {:>9}  {:>10}",
                    episodes,
                    episode.len(),
                    episode.total_reward(),
                    if episode.terminated() { "yes" } else { "no" },
                    end - start
                );
                episodes += 1;
                steps += episode.len();
                reward += episode.total_reward();
                start = end;
            }
            Ok(None) => break,
            Err(e @ Error::LogCorruption { .. }) => {
                println!();
                println!("Totals: {} episodes, {} steps, reward {:.2}", episodes, steps, reward);
                eprintln!("Error: {}", e);
                return Ok(false);
            }
            Err(e) => return Err(e),
        }
    }

    println!();
    println!(
        "Totals: {} episodes, {} steps, reward {:.2}, {} bytes",
        episodes,
        steps,
        reward,
        reader.offset()
    );
    Ok(true)
}

fn playback(
    path: &Path,
    export: Option<PathBuf>,
    frames_dir: Option<PathBuf>,
    delay_ms: Option<u64>,
    config: &Config,
) -> Result<bool> {
    let converter = KinematicsConverter::new(config.kinematics)?;
    let mut reader = LogReader::open_with(path, config.recording.max_record_bytes)?;

    let delay = delay_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.review.frame_delay());
    let mut renderer = ConsoleRenderer::new().with_delay(delay);
    if let Some(dir) = frames_dir {
        renderer = renderer.with_dumper(FrameDumper::new(dir)?);
    }

    let mut exporter = match export.or_else(|| config.review.export_path.clone()) {
        Some(csv_path) => Some(DutyExporter::open(csv_path)?),
        None => None,
    };

    let summary = play_log(
        &mut reader,
        &converter,
        &mut renderer,
        exporter.as_mut(),
        config.review.overlay,
    )?;

    if let Some(exporter) = exporter.as_mut() {
        exporter.flush()?;
    }

    println!(
        "Played {} episodes ({} steps, reward {:.2}, {} rows exported)",
        summary.episodes, summary.steps, summary.total_reward, summary.rows_exported
    );
    if let Some(fault) = &summary.corruption {
        eprintln!("Error: log is corrupt at {}", fault);
        return Ok(false);
    }
    Ok(true)
}

//! Smriti - Episode recording and review for driving-simulator data collection
//!
//! An operator drives a simulated vehicle; every tick's frame, action,
//! reward and termination flag is buffered, reviewed at the end of the
//! episode, and either committed to an append-only log or discarded.
//! Logs are played back offline through the same differential-drive
//! conversion used during review.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      main                           │  ← CLI (inspect, playback)
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                    session/                         │  ← Live recording loop
//! │       (buffer, recorder, commands, driver)          │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                    review/                          │  ← Orchestration
//! │     (workflow, replay, overlay, playback)           │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                      io/                            │  ← Persistence
//! │          (episode_log, export, frames)              │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                  kinematics                         │  ← Command → wheel duty
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │         (Frame, Step, Episode, metadata)            │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Data flow
//!
//! ```text
//! simulator tick ─► RecordingSession::step ─► EpisodeBuffer
//!                                                  │ (done / reset)
//!                                                  ▼
//!                                           ReviewWorkflow
//!                                     commit │            │ discard
//!                                            ▼            ▼
//!                                       LogWriter     buffer.clear()
//!
//! LogReader ─► replay ─► KinematicsConverter ─► telemetry / CSV / PNG
//! ```

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;
pub mod error;

// ============================================================================
// Layer 2: Kinematics (depends on core)
// ============================================================================
pub mod kinematics;

// ============================================================================
// Layer 3: I/O infrastructure (depends on core, kinematics)
// ============================================================================
pub mod io;

// ============================================================================
// Layer 4: Review and playback (depends on io, kinematics)
// ============================================================================
pub mod review;

// ============================================================================
// Layer 5: Live recording (depends on all layers)
// ============================================================================
pub mod session;

pub mod config;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

pub use config::Config;
pub use error::{Error, Result};

// Core types
pub use crate::core::types::{ACTION_DIM, Episode, Frame, MetaValue, Metadata, Step};

// Kinematics
pub use kinematics::{KinematicsConverter, KinematicsParameters, WheelDuty};

// I/O
pub use io::episode_log::{Episodes, LogReader, LogWriter, RecordInfo, WriterOptions};
pub use io::{DutyExporter, DutyRow, FrameDumper};

// Review
pub use review::{
    ConsoleRenderer, DecisionSource, PlaybackSummary, ReplayStep, ReviewDecision, ReviewOutcome,
    ReviewRenderer, ReviewState, ReviewWorkflow, ScriptedDecisions, TerminalPrompt, play_log,
    replay,
};

// Session
pub use session::{
    ControlInput, ControlSource, EpisodeBuffer, InvalidStepPolicy, OperatorCommand,
    RecordingSession, SessionStats, SimStep, Simulator, StepStatus, run_session,
};

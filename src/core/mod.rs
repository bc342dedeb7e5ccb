//! Core foundation types.
//!
//! Everything here is plain data with no I/O. Higher layers (kinematics,
//! log persistence, review) build on these types.

pub mod types;

pub use types::{Episode, Frame, MetaValue, Metadata, Step, ACTION_DIM};

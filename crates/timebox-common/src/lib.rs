//! # Timebox Common
//!
//! Shared types for the timebox execution crates.
//!
//! This crate holds the error taxonomy used by both the process
//! supervisor and the script runner, so that callers see one failure
//! vocabulary regardless of which execution path they took.

pub mod errors;

// Re-export main types
pub use errors::*;

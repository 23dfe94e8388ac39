//! # Timebox Script
//!
//! Deadline-bound execution of ad-hoc shell scripts.
//!
//! This crate materializes an inline script body to a caller-supplied
//! path, executes it through a shell under a cancellation deadline,
//! captures combined stdout/stderr, and guarantees the script file is
//! removed on every exit path. It shares the failure taxonomy of the
//! supervisor crate but enforces its deadline through a cancellation
//! token rather than the explicit group-kill path.
//!
//! Plain no-timeout capture helpers ([`capture_stdout`] and friends)
//! live here as well.

pub mod artifact;
pub mod capture;
pub mod deadline;
pub mod runner;

// Re-export main types
pub use artifact::*;
pub use capture::*;
pub use deadline::*;
pub use runner::*;

//! # Timebox Process
//!
//! Process-group supervision with deadline enforcement.
//!
//! This crate provides Unix primitives for:
//! - Spawning a command as the leader of its own process group
//! - Racing a started process against a wall-clock budget
//! - Forced termination of a whole process group
//! - Process existence checking
//!
//! The central guarantee is that a supervised process which overruns its
//! budget is killed together with every descendant it spawned: the kill
//! targets the process group, never a lone PID.
//!
//! The crate is Unix-only; it relies on the POSIX process-group
//! convention. A port to a platform without that convention would have
//! to substitute its native kill-entire-job facility.

pub mod check;
pub mod group;
pub mod supervise;
pub mod terminate;

// Re-export main types
pub use check::*;
pub use group::*;
pub use supervise::*;
pub use terminate::*;

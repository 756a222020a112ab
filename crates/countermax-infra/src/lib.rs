//! Infrastructure layer for countermax
//!
//! File-backed implementations of the domain repository traits and the
//! task file (.dat) codec.

pub mod persistence;
pub mod task_file;

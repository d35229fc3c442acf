//! Shared local filesystem operations
//!
//! This module provides the whole-file read and atomic write primitives the
//! local backend is built from.

pub mod blocking;
pub mod read;
pub mod write;

pub use blocking::run_blocking;
pub use read::read_file_content;
pub use write::{write_file_atomic, WriteOptions};

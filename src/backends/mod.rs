//! Filesystem backend implementations
//!
//! This module provides concrete implementers of the [`FileSystem`](crate::traits::FileSystem)
//! port: a disk backend rooted at a base directory and an in-memory store.

pub mod local;
pub mod memory;

// Re-export main types for convenience
pub use local::{LocalFileSystem, LocalOptions};
pub use memory::MemoryFileSystem;

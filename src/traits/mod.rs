//! Core traits for the filesystem port
//!
//! This module provides the capability set that consumers depend on
//! ([`FileSystem`]), its type-erased shared form ([`FileSystemPtr`]) and the
//! value types that cross the boundary ([`StatResult`], [`IoBuffer`]).

pub mod dynamic;
pub mod filesystem;
pub mod stat;

pub use dynamic::{shared, DynFileSystem, FileSystemPtr};
pub use filesystem::{FileSystem, IoBuffer};
pub use stat::{now_posix_seconds, posix_seconds, StatResult};

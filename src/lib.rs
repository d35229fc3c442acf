//! # fsport
//!
//! An asynchronous, path-based filesystem port: the capability set a library
//! needs for file I/O without depending on a concrete OS binding.
//!
//! - [`FileSystem`] - the port (read, write, move, remove, stat, resolve)
//! - [`FileSystemPtr`] - shared, type-erased handle to an implementer
//! - [`LocalFileSystem`] / [`MemoryFileSystem`] - disk and in-memory implementers
//! - [`InstrumentedFileSystem`] - logging and counting decorator
//! - [`CallbackFileSystem`] - exactly-once completion callbacks with a string
//!   error channel, for embedders that cannot poll futures
//!
//! ## Example
//!
//! ```rust,no_run
//! use fsport::{FileSystem, MemoryFileSystem};
//!
//! # #[compio::main]
//! # async fn main() -> fsport::Result<()> {
//! let fs = MemoryFileSystem::new();
//! fs.write("greeting.txt", b"hello").await?;
//! assert_eq!(fs.read("greeting.txt").await?, b"hello");
//! assert!(!fs.stat("missing.txt").await?.exists);
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod callback;
pub mod cli;
pub mod error;
pub mod filesystem;
pub mod instrumented;
pub mod paths;
pub mod stats;
pub mod traits;

pub use backends::{LocalFileSystem, LocalOptions, MemoryFileSystem};
pub use callback::{CallbackFileSystem, CallbackOptions, Completion};
pub use error::{error_string, ErrorKind, FsError, Result};
pub use instrumented::InstrumentedFileSystem;
pub use stats::{OperationCounts, OperationStats};
pub use traits::{shared, DynFileSystem, FileSystem, FileSystemPtr, IoBuffer, StatResult};

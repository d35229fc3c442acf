//! `FileSystem` trait: the asynchronous, path-based capability set
//!
//! This trait is the port that consumers program against. It can be
//! implemented by a disk backend, an in-memory store, a network-backed store
//! or a test double. Every operation is an independent request: no handle or
//! session state is threaded between calls.

use crate::error::Result;

use super::StatResult;

/// Owned, contiguous byte buffer holding file contents
///
/// A buffer returned by [`FileSystem::read`] is moved to the caller, never
/// copied.
pub type IoBuffer = Vec<u8>;

/// Asynchronous filesystem capability set
///
/// # Contract
///
/// - Operations never panic across the boundary; every failure is an
///   `Err(FsError)` whose display text is non-empty and human-readable.
/// - `stat` of a missing path is **not** an error: it returns
///   `StatResult::default()`.
/// - `resolve` is synchronous and infallible.
/// - The implementing object is shared (`Send + Sync`); thread safety under
///   concurrent calls is the implementer's obligation, and each implementer
///   documents its own ordering guarantees for concurrent operations on the
///   same path.
///
/// # Examples
///
/// ```rust,ignore
/// use fsport::{FileSystem, MemoryFileSystem};
///
/// let fs = MemoryFileSystem::new();
/// fs.write("notes/today.txt", b"hello").await?;
/// let data = fs.read("notes/today.txt").await?;
/// assert_eq!(data, b"hello");
/// ```
pub trait FileSystem: Send + Sync + 'static {
    /// Read the full contents of a file
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` if:
    /// - The file doesn't exist
    /// - Permission is denied
    /// - The path is a directory
    /// - I/O error occurs
    async fn read(&self, path: &str) -> Result<IoBuffer>;

    /// Replace the contents of a file
    ///
    /// `data` is borrowed only for the duration of the call. Implementers
    /// must not leave a partially written file visible to concurrent readers.
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` if:
    /// - The parent directory doesn't exist (and the implementer doesn't create it)
    /// - Permission is denied
    /// - The path is a directory
    /// - I/O error occurs
    async fn write(&self, path: &str, data: &[u8]) -> Result<()>;

    /// Move (rename) a file or directory
    ///
    /// Whether an existing destination is overwritten is implementer-defined
    /// and documented by each implementer.
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` if:
    /// - `from` doesn't exist
    /// - Permission is denied
    /// - I/O error occurs
    async fn move_file(&self, from: &str, to: &str) -> Result<()>;

    /// Remove a file or empty directory
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` if:
    /// - The path doesn't exist (implementer-defined, see implementer docs)
    /// - Permission is denied
    /// - The directory is not empty
    /// - I/O error occurs
    async fn remove(&self, path: &str) -> Result<()>;

    /// Get information about a path
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` only when the stat could not be attempted
    /// (permission denied on a parent, I/O error). A missing path yields
    /// `Ok(StatResult::default())`.
    async fn stat(&self, path: &str) -> Result<StatResult>;

    /// Resolve a relative or absolute path to an absolute one
    ///
    /// Pure function of `path` and the implementer's base directory.
    fn resolve(&self, path: &str) -> String;

    // =========================================================================
    // Provided methods with default implementations
    // =========================================================================

    /// Check if a path exists
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` if the underlying `stat` fails.
    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.stat(path).await?.exists)
    }

    /// Get the filesystem name for debugging/logging
    fn name(&self) -> &'static str {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FsError;

    // Minimal implementer for exercising provided methods
    struct SingleFile;

    impl FileSystem for SingleFile {
        async fn read(&self, path: &str) -> Result<IoBuffer> {
            if path == "/only" {
                Ok(b"only".to_vec())
            } else {
                Err(FsError::NotFound {
                    path: path.to_string(),
                })
            }
        }

        async fn write(&self, _path: &str, _data: &[u8]) -> Result<()> {
            Err(FsError::Other("read-only".to_string()))
        }

        async fn move_file(&self, _from: &str, _to: &str) -> Result<()> {
            Err(FsError::Other("read-only".to_string()))
        }

        async fn remove(&self, _path: &str) -> Result<()> {
            Err(FsError::Other("read-only".to_string()))
        }

        async fn stat(&self, path: &str) -> Result<StatResult> {
            if path == "/only" {
                Ok(StatResult::file(1))
            } else if path == "/broken" {
                Err(FsError::Other("stat failed".to_string()))
            } else {
                Ok(StatResult::default())
            }
        }

        fn resolve(&self, path: &str) -> String {
            format!("/{}", path.trim_start_matches('/'))
        }
    }

    #[compio::test]
    async fn test_exists_provided_method() {
        let fs = SingleFile;
        assert!(fs.exists("/only").await.unwrap());
        assert!(!fs.exists("/other").await.unwrap());
        assert!(fs.exists("/broken").await.is_err());
    }

    #[test]
    fn test_default_name() {
        assert_eq!(SingleFile.name(), "unknown");
    }
}

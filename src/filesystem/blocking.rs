//! Blocking `std::fs` calls moved off the io_uring event loop
//!
//! Some queries have no reliable compio equivalent (symlink resolution,
//! `chmod` by path, and a `stat` whose timestamps compio's statx path leaves
//! zeroed). Those run on compio's blocking pool instead.

use crate::error::{FsError, Result};
use std::io;
use std::path::Path;

/// Run `op` on the blocking pool, attributing failures to `path`
///
/// # Errors
///
/// Returns `Err(FsError)` if `op` fails (classified via
/// [`FsError::from_io`]) or if the blocking task panics.
pub async fn run_blocking<T, F>(path: &Path, op: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    let path_str = path.display().to_string();
    compio::runtime::spawn_blocking(op)
        .await
        .map_err(|e| FsError::Other(format!("Blocking task for {path_str} failed: {e:?}")))?
        .map_err(|e| FsError::from_io(path_str, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[compio::test]
    async fn test_run_blocking_returns_value() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let file_path = temp_dir.path().join("value.txt");
        std::fs::write(&file_path, b"12345")?;

        let lookup = file_path.clone();
        let len = run_blocking(&file_path, move || std::fs::metadata(lookup).map(|m| m.len()))
            .await?;

        assert_eq!(len, 5);
        Ok(())
    }

    #[compio::test]
    async fn test_run_blocking_classifies_errors() {
        let missing = Path::new("/nonexistent/fsport/blocking");
        let result = run_blocking(missing, move || std::fs::metadata(missing)).await;

        match result {
            Err(FsError::NotFound { path }) => assert!(path.contains("blocking")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}

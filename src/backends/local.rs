//! Local filesystem backend implementation
//!
//! This module provides a disk-backed implementer of the port rooted at a
//! base directory, using compio for async I/O (io_uring on Linux).
//!
//! # Semantics
//!
//! - `write` is atomic: a sibling temporary is renamed over the target.
//! - `move_file` overwrites an existing destination file (POSIX `rename`).
//! - `remove` deletes a file or an empty directory; a missing path is an error.
//! - `stat` follows symlinks; a missing path yields `StatResult::default()`.
//! - A trailing separator (`name/`) only ever matches a directory.
//! - `write` through a symlink replaces the file it points at and keeps the
//!   existing file's permissions.
//! - No per-path ordering is imposed beyond what the OS provides: concurrent
//!   writes to one path are last-rename-wins and readers never see a partial
//!   file.

use crate::error::{FsError, Result};
use crate::filesystem::{read_file_content, run_blocking, write_file_atomic, WriteOptions};
use crate::paths::{has_trailing_separator, resolve_native};
use crate::traits::{FileSystem, IoBuffer, StatResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration for [`LocalFileSystem`]
///
/// Owned by this module; the CLI converts its flags into it.
#[derive(Debug, Clone)]
pub struct LocalOptions {
    /// Directory relative paths are resolved against
    base_dir: PathBuf,
    /// Flush written data to storage before making it visible
    sync_writes: bool,
    /// Create missing parent directories on write
    create_parents: bool,
}

impl LocalOptions {
    /// Create options rooted at `base_dir`
    ///
    /// A relative `base_dir` is made absolute against the process working
    /// directory once, here, so that `resolve` stays a pure function.
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` if `base_dir` is relative and the working
    /// directory cannot be determined.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let base_dir = if base_dir.is_absolute() {
            base_dir
        } else {
            let cwd = std::env::current_dir().map_err(|e| FsError::from_io(".", e))?;
            cwd.join(base_dir)
        };
        Ok(Self {
            base_dir: crate::paths::normalize_native(&base_dir),
            sync_writes: false,
            create_parents: false,
        })
    }

    /// Flush data to storage on every write
    #[must_use]
    pub const fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    /// Create missing parent directories on write
    #[must_use]
    pub const fn with_create_parents(mut self, create_parents: bool) -> Self {
        self.create_parents = create_parents;
        self
    }

    /// Get the base directory
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Check if writes are synced
    #[must_use]
    pub const fn sync_writes(&self) -> bool {
        self.sync_writes
    }

    /// Check if parents are created on write
    #[must_use]
    pub const fn create_parents(&self) -> bool {
        self.create_parents
    }
}

/// Local filesystem backend using compio
///
/// Stateless apart from its options, so it is cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    options: LocalOptions,
}

impl LocalFileSystem {
    /// Create a new `LocalFileSystem` from options
    #[must_use]
    pub const fn new(options: LocalOptions) -> Self {
        Self { options }
    }

    /// Create a backend rooted at `base_dir` with default options
    ///
    /// # Errors
    ///
    /// See [`LocalOptions::new`].
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(LocalOptions::new(base_dir)?))
    }

    /// Get the options this backend was built with
    #[must_use]
    pub const fn options(&self) -> &LocalOptions {
        &self.options
    }

    fn native_path(&self, path: &str) -> PathBuf {
        resolve_native(&self.options.base_dir, path)
    }
}

/// Fail with `NotADirectory` when `required` and `path` is a non-directory
///
/// A missing path passes; the operation itself reports it.
async fn require_directory_if(required: bool, path: &Path) -> Result<()> {
    if !required {
        return Ok(());
    }
    match compio::fs::metadata(path).await {
        Ok(metadata) if !metadata.is_dir() => Err(FsError::NotADirectory {
            path: path.display().to_string(),
        }),
        _ => Ok(()),
    }
}

impl FileSystem for LocalFileSystem {
    async fn read(&self, path: &str) -> Result<IoBuffer> {
        let native = self.native_path(path);
        require_directory_if(has_trailing_separator(path), &native).await?;
        read_file_content(&native).await
    }

    async fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        let native = self.native_path(path);
        if has_trailing_separator(path) {
            return Err(FsError::IsADirectory {
                path: native.display().to_string(),
            });
        }
        let options = WriteOptions {
            sync: self.options.sync_writes,
            create_parents: self.options.create_parents,
        };
        write_file_atomic(&native, data, options).await
    }

    async fn move_file(&self, from: &str, to: &str) -> Result<()> {
        let from_path = self.native_path(from);
        let to_path = self.native_path(to);
        let trailing = has_trailing_separator(from) || has_trailing_separator(to);
        require_directory_if(trailing, &from_path).await?;

        if let Err(e) = compio::fs::rename(&from_path, &to_path).await {
            // ENOENT is ambiguous: blame the source only if it is really gone
            let source_missing = e.kind() == ErrorKind::NotFound
                && compio::fs::symlink_metadata(&from_path).await.is_err();
            let blamed = if source_missing { &from_path } else { &to_path };
            return Err(FsError::from_io(blamed.display().to_string(), e));
        }

        debug!("Moved {} to {}", from_path.display(), to_path.display());
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<()> {
        let native = self.native_path(path);
        let path_str = native.display().to_string();

        let metadata = compio::fs::symlink_metadata(&native)
            .await
            .map_err(|e| FsError::from_io(path_str.as_str(), e))?;
        if has_trailing_separator(path) && !metadata.is_dir() {
            return Err(FsError::NotADirectory { path: path_str });
        }

        let result = if metadata.is_dir() {
            compio::fs::remove_dir(&native).await
        } else {
            compio::fs::remove_file(&native).await
        };
        result.map_err(|e| FsError::from_io(path_str.as_str(), e))?;

        debug!("Removed {}", native.display());
        Ok(())
    }

    async fn stat(&self, path: &str) -> Result<StatResult> {
        let native = self.native_path(path);
        let lookup = native.clone();

        // compio's statx path leaves timestamps zeroed, so ask std on the
        // blocking pool; a path through a regular file cannot exist either
        let metadata = run_blocking(&native, move || match std::fs::metadata(lookup) {
            Ok(metadata) => Ok(Some(metadata)),
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                Ok(None)
            }
            Err(e) => Err(e),
        })
        .await?;

        Ok(match metadata {
            Some(m) if m.is_dir() || !has_trailing_separator(path) => {
                StatResult::from_entry(m.is_dir(), m.is_file(), m.modified().ok())
            }
            _ => StatResult::default(),
        })
    }

    fn resolve(&self, path: &str) -> String {
        self.native_path(path).to_string_lossy().into_owned()
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

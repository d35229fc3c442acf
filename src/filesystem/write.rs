//! Atomic file replacement with compio
//!
//! Data is written to a hidden temporary next to the target and renamed over
//! it, so concurrent readers see either the old contents or the new contents,
//! never a partial file.
//!
//! The replacement behaves like overwriting in place: a symlinked target is
//! followed and the file it points at is replaced, and an existing file keeps
//! its permission bits.

use crate::error::{FsError, Result};
use crate::filesystem::run_blocking;
use compio::buf::BufResult;
use compio::fs::{File, OpenOptions};
use compio::io::AsyncWriteAtExt;
use std::fs::Permissions;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Same limit as Linux `MAXSYMLINKS`
const MAX_SYMLINK_HOPS: usize = 40;

/// Options controlling how a file is replaced
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Flush file data to storage before the rename
    pub sync: bool,
    /// Create missing parent directories
    pub create_parents: bool,
}

/// Replace a file's content atomically
///
/// # Parameters
///
/// * `path` - Target file (symlinks are followed)
/// * `content` - Data to write (copied into an owned buffer for io_uring)
/// * `options` - Sync and parent-creation behaviour
///
/// # Errors
///
/// Returns `Err(FsError)` if:
/// - The parent directory doesn't exist and `create_parents` is off
/// - A symlink chain is too long or cannot be read
/// - The temporary cannot be created, written or given the old permissions
/// - Sync fails
/// - The rename fails (e.g. the target is a directory)
///
/// The temporary is removed on every failure path.
///
/// # Examples
///
/// ```rust,ignore
/// use fsport::filesystem::{write_file_atomic, WriteOptions};
///
/// write_file_atomic(Path::new("/tmp/out.txt"), b"Hello, World!", WriteOptions::default()).await?;
/// ```
pub async fn write_file_atomic(path: &Path, content: &[u8], options: WriteOptions) -> Result<()> {
    let lookup = path.to_path_buf();
    let (target, permissions) = run_blocking(path, move || inspect_target(&lookup)).await?;

    if options.create_parents {
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            compio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FsError::from_io(parent.display().to_string(), e))?;
        }
    }

    let temp_path = temp_path_for(&target)?;
    let result = write_then_rename(&temp_path, &target, content, options.sync, permissions).await;

    if result.is_err() {
        if let Err(e) = compio::fs::remove_file(&temp_path).await {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(
                    "Failed to clean up temporary {}: {}",
                    temp_path.display(),
                    e
                );
            }
        }
    } else {
        debug!("Replaced {} ({} bytes)", target.display(), content.len());
    }

    result
}

/// Follow symlinks from `path` and read the final file's permissions
///
/// A dangling link resolves to the path it points at, which the write then
/// creates. Permissions are `None` unless the final target is a regular file.
fn inspect_target(path: &Path) -> io::Result<(PathBuf, Option<Permissions>)> {
    let mut target = path.to_path_buf();
    for _ in 0..MAX_SYMLINK_HOPS {
        match std::fs::symlink_metadata(&target) {
            Ok(m) if m.file_type().is_symlink() => {
                let link = std::fs::read_link(&target)?;
                target = match target.parent() {
                    Some(parent) if link.is_relative() => parent.join(link),
                    _ => link,
                };
            }
            Ok(m) => return Ok((target, m.is_file().then(|| m.permissions()))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok((target, None)),
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::other(format!(
        "Too many levels of symbolic links: {}",
        path.display()
    )))
}

async fn write_then_rename(
    temp_path: &Path,
    path: &Path,
    content: &[u8],
    sync: bool,
    permissions: Option<Permissions>,
) -> Result<()> {
    let temp_str = temp_path.display().to_string();

    let mut file: File = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(temp_path)
        .await
        .map_err(|e| FsError::from_io(path.display().to_string(), e))?;

    if !content.is_empty() {
        let BufResult(result, _) = file.write_all_at(content.to_vec(), 0).await;
        result.map_err(|e| FsError::from_io(temp_str.as_str(), e))?;
    }

    if let Some(permissions) = permissions {
        let temp = temp_path.to_path_buf();
        run_blocking(temp_path, move || std::fs::set_permissions(temp, permissions)).await?;
    }

    if sync {
        file.sync_all()
            .await
            .map_err(|e| FsError::from_io(temp_str.as_str(), e))?;
    }

    drop(file);

    compio::fs::rename(temp_path, path)
        .await
        .map_err(|e| FsError::from_io(path.display().to_string(), e))
}

/// Hidden sibling path used as the write temporary
fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        FsError::Other(format!("Cannot write to a path without a file name: {}", path.display()))
    })?;
    let temp_name = format!(
        ".{}.{:016x}.tmp",
        file_name.to_string_lossy(),
        rand::random::<u64>()
    );
    Ok(path.with_file_name(temp_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> anyhow::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    #[compio::test]
    async fn test_write_small_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let file_path = temp_dir.path().join("test.txt");

        write_file_atomic(&file_path, b"Hello, World!", WriteOptions::default()).await?;

        assert_eq!(fs::read(&file_path)?, b"Hello, World!");
        assert_eq!(entries(temp_dir.path())?, vec!["test.txt".to_string()]);

        Ok(())
    }

    #[compio::test]
    async fn test_write_empty_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let file_path = temp_dir.path().join("empty.txt");

        write_file_atomic(&file_path, b"", WriteOptions::default()).await?;

        assert!(fs::read(&file_path)?.is_empty());

        Ok(())
    }

    #[compio::test]
    async fn test_write_large_file_with_sync() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let file_path = temp_dir.path().join("large.dat");
        let data = vec![0x42u8; 5 * 1024 * 1024];

        let options = WriteOptions {
            sync: true,
            create_parents: false,
        };
        write_file_atomic(&file_path, &data, options).await?;

        let content = fs::read(&file_path)?;
        assert_eq!(content.len(), 5 * 1024 * 1024);
        assert!(content.iter().all(|&b| b == 0x42));

        Ok(())
    }

    #[compio::test]
    async fn test_write_overwrites_existing() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let file_path = temp_dir.path().join("overwrite.txt");
        fs::write(&file_path, b"Original content that is longer")?;

        write_file_atomic(&file_path, b"New content", WriteOptions::default()).await?;

        assert_eq!(fs::read(&file_path)?, b"New content");

        Ok(())
    }

    #[compio::test]
    async fn test_write_missing_parent_fails_without_create() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let file_path = temp_dir.path().join("missing").join("file.txt");

        let result = write_file_atomic(&file_path, b"data", WriteOptions::default()).await;

        assert!(matches!(result, Err(FsError::NotFound { .. })));

        Ok(())
    }

    #[compio::test]
    async fn test_write_creates_parents() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let file_path = temp_dir.path().join("a").join("b").join("file.txt");

        let options = WriteOptions {
            sync: false,
            create_parents: true,
        };
        write_file_atomic(&file_path, b"nested", options).await?;

        assert_eq!(fs::read(&file_path)?, b"nested");

        Ok(())
    }

    #[compio::test]
    async fn test_write_over_directory_leaves_no_temporary() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let dir_path = temp_dir.path().join("occupied");
        fs::create_dir(&dir_path)?;

        let result = write_file_atomic(&dir_path, b"data", WriteOptions::default()).await;

        assert!(result.is_err());
        assert_eq!(entries(temp_dir.path())?, vec!["occupied".to_string()]);

        Ok(())
    }

    #[cfg(unix)]
    #[compio::test]
    async fn test_write_preserves_permissions() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new()?;
        let file_path = temp_dir.path().join("secret.txt");
        fs::write(&file_path, b"old")?;
        fs::set_permissions(&file_path, fs::Permissions::from_mode(0o600))?;

        write_file_atomic(&file_path, b"new", WriteOptions::default()).await?;

        assert_eq!(fs::read(&file_path)?, b"new");
        let mode = fs::metadata(&file_path)?.permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "mode after write: {mode:o}");

        Ok(())
    }

    #[cfg(unix)]
    #[compio::test]
    async fn test_write_through_symlink_replaces_target() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let target = temp_dir.path().join("target.txt");
        let link = temp_dir.path().join("link.txt");
        fs::write(&target, b"old")?;
        std::os::unix::fs::symlink("target.txt", &link)?;

        write_file_atomic(&link, b"new", WriteOptions::default()).await?;

        assert!(fs::symlink_metadata(&link)?.file_type().is_symlink());
        assert_eq!(fs::read(&target)?, b"new");
        assert_eq!(
            entries(temp_dir.path())?,
            vec!["link.txt".to_string(), "target.txt".to_string()]
        );

        Ok(())
    }

    #[cfg(unix)]
    #[compio::test]
    async fn test_write_through_dangling_symlink_creates_target() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        fs::create_dir(temp_dir.path().join("real"))?;
        let link = temp_dir.path().join("link.txt");
        std::os::unix::fs::symlink(temp_dir.path().join("real").join("new.txt"), &link)?;

        write_file_atomic(&link, b"created", WriteOptions::default()).await?;

        assert!(fs::symlink_metadata(&link)?.file_type().is_symlink());
        assert_eq!(fs::read(temp_dir.path().join("real").join("new.txt"))?, b"created");

        Ok(())
    }

    #[cfg(unix)]
    #[compio::test]
    async fn test_write_symlink_loop_fails() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let a = temp_dir.path().join("a");
        let b = temp_dir.path().join("b");
        std::os::unix::fs::symlink(&b, &a)?;
        std::os::unix::fs::symlink(&a, &b)?;

        let result = write_file_atomic(&a, b"data", WriteOptions::default()).await;

        assert!(result.is_err());
        assert!(fs::symlink_metadata(&a)?.file_type().is_symlink());

        Ok(())
    }
}

//! Whole-file reading with compio
//!
//! Provides the read half of the local backend: open, size the buffer from
//! metadata, then read positionally until EOF.

use crate::error::{FsError, Result};
use compio::fs::File;
use compio::buf::BufResult;
use compio::io::AsyncReadAtExt;
use std::path::Path;

/// Read entire file content
///
/// The buffer is pre-sized from the file's metadata but reading continues to
/// EOF, so files that grow (or report a size of 0, like procfs entries) are
/// read completely.
///
/// # Parameters
///
/// * `path` - File to read
///
/// # Returns
///
/// Returns `Ok(Vec<u8>)` containing the entire file content
///
/// # Errors
///
/// Returns `Err(FsError)` if:
/// - File cannot be opened
/// - The path is a directory
/// - File cannot be read
///
/// # Examples
///
/// ```rust,ignore
/// use fsport::filesystem::read_file_content;
///
/// #[compio::main]
/// async fn main() -> fsport::Result<()> {
///     let content = read_file_content(Path::new("/etc/hostname")).await?;
///     println!("Read {} bytes", content.len());
///     Ok(())
/// }
/// ```
pub async fn read_file_content(path: &Path) -> Result<Vec<u8>> {
    let path_str = path.display().to_string();

    let file = File::open(path)
        .await
        .map_err(|e| FsError::from_io(path_str.as_str(), e))?;

    let m = file
        .metadata()
        .await
        .map_err(|e| FsError::from_io(path_str.as_str(), e))?;

    if m.is_dir() {
        return Err(FsError::IsADirectory { path: path_str });
    }

    let capacity = usize::try_from(m.len()).unwrap_or(0);
    let BufResult(result, content) = file.read_to_end_at(Vec::with_capacity(capacity), 0).await;
    result.map_err(|e| FsError::from_io(path_str.as_str(), e))?;

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[compio::test]
    async fn test_read_small_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let file_path = temp_dir.path().join("test.txt");
        fs::write(&file_path, b"Hello, World!")?;

        let content = read_file_content(&file_path).await?;

        assert_eq!(content, b"Hello, World!");

        Ok(())
    }

    #[compio::test]
    async fn test_read_empty_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let file_path = temp_dir.path().join("empty.txt");
        fs::File::create(&file_path)?;

        let content = read_file_content(&file_path).await?;

        assert!(content.is_empty());

        Ok(())
    }

    #[compio::test]
    async fn test_read_binary_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let file_path = temp_dir.path().join("data.bin");
        let data: Vec<u8> = (0..=255).collect();
        fs::write(&file_path, &data)?;

        let content = read_file_content(&file_path).await?;

        assert_eq!(content, data);

        Ok(())
    }

    #[compio::test]
    async fn test_read_large_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let file_path = temp_dir.path().join("large.dat");
        let data = vec![0x42u8; 3 * 1024 * 1024 + 17];
        fs::write(&file_path, &data)?;

        let content = read_file_content(&file_path).await?;

        assert_eq!(content.len(), data.len());
        assert!(content.iter().all(|&b| b == 0x42));

        Ok(())
    }

    #[compio::test]
    async fn test_read_nonexistent_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;

        let result = read_file_content(&temp_dir.path().join("nonexistent.txt")).await;

        assert!(matches!(result, Err(FsError::NotFound { .. })));

        Ok(())
    }

    #[compio::test]
    async fn test_read_directory_fails() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;

        let result = read_file_content(temp_dir.path()).await;

        assert!(result.is_err());

        Ok(())
    }
}

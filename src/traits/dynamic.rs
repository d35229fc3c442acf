//! Object-safe view of [`FileSystem`] for shared, type-erased handles
//!
//! `FileSystem` uses `async fn` and therefore cannot be a trait object. The
//! [`DynFileSystem`] trait boxes each future so that many subsystems can hold
//! the same capability through a [`FileSystemPtr`] without naming its type.

use std::sync::Arc;

use futures::future::LocalBoxFuture;

use crate::error::Result;

use super::{FileSystem, IoBuffer, StatResult};

/// Shared handle to a type-erased filesystem capability
pub type FileSystemPtr = Arc<dyn DynFileSystem>;

/// Object-safe mirror of [`FileSystem`]
///
/// Implemented for every `FileSystem`; there is no reason to implement it by
/// hand. Futures are `!Send` because compio runs them on the thread that
/// polls them.
pub trait DynFileSystem: Send + Sync + 'static {
    /// See [`FileSystem::read`]
    fn read_boxed<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<IoBuffer>>;

    /// See [`FileSystem::write`]
    fn write_boxed<'a>(&'a self, path: &'a str, data: &'a [u8]) -> LocalBoxFuture<'a, Result<()>>;

    /// See [`FileSystem::move_file`]
    fn move_file_boxed<'a>(&'a self, from: &'a str, to: &'a str)
        -> LocalBoxFuture<'a, Result<()>>;

    /// See [`FileSystem::remove`]
    fn remove_boxed<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<()>>;

    /// See [`FileSystem::stat`]
    fn stat_boxed<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<StatResult>>;

    /// See [`FileSystem::resolve`]
    fn resolve_path(&self, path: &str) -> String;

    /// See [`FileSystem::name`]
    fn backend_name(&self) -> &'static str;
}

impl<F: FileSystem> DynFileSystem for F {
    fn read_boxed<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<IoBuffer>> {
        Box::pin(FileSystem::read(self, path))
    }

    fn write_boxed<'a>(&'a self, path: &'a str, data: &'a [u8]) -> LocalBoxFuture<'a, Result<()>> {
        Box::pin(FileSystem::write(self, path, data))
    }

    fn move_file_boxed<'a>(
        &'a self,
        from: &'a str,
        to: &'a str,
    ) -> LocalBoxFuture<'a, Result<()>> {
        Box::pin(FileSystem::move_file(self, from, to))
    }

    fn remove_boxed<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<()>> {
        Box::pin(FileSystem::remove(self, path))
    }

    fn stat_boxed<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<StatResult>> {
        Box::pin(FileSystem::stat(self, path))
    }

    fn resolve_path(&self, path: &str) -> String {
        FileSystem::resolve(self, path)
    }

    fn backend_name(&self) -> &'static str {
        FileSystem::name(self)
    }
}

/// Wrap a concrete filesystem in a shared handle
#[must_use]
pub fn shared<F: FileSystem>(fs: F) -> FileSystemPtr {
    Arc::new(fs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryFileSystem;

    #[compio::test]
    async fn test_shared_handle_dispatches_to_backend() {
        let fs = shared(MemoryFileSystem::new());
        let other_owner = Arc::clone(&fs);

        fs.write_boxed("/a.txt", b"shared").await.unwrap();
        let data = other_owner.read_boxed("/a.txt").await.unwrap();
        assert_eq!(data, b"shared");

        let stat = other_owner.stat_boxed("/a.txt").await.unwrap();
        assert!(stat.is_file);
        assert_eq!(other_owner.backend_name(), "memory");
        assert_eq!(fs.resolve_path("a.txt"), "/a.txt");
    }
}

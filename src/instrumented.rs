//! Logging and counting decorator for any filesystem backend
//!
//! `InstrumentedFileSystem` forwards every call unchanged, emits a `tracing`
//! event per operation and keeps [`OperationStats`] counters.

use crate::error::Result;
use crate::stats::{OperationCounts, OperationStats};
use crate::traits::{FileSystem, IoBuffer, StatResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Decorator that logs and counts operations on an inner filesystem
#[derive(Debug)]
pub struct InstrumentedFileSystem<F: FileSystem> {
    inner: F,
    stats: Arc<OperationStats>,
}

impl<F: FileSystem> InstrumentedFileSystem<F> {
    /// Wrap `inner` with fresh counters
    #[must_use]
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            stats: Arc::new(OperationStats::new()),
        }
    }

    /// Get a reference to the wrapped filesystem
    #[must_use]
    pub const fn inner(&self) -> &F {
        &self.inner
    }

    /// Shared handle to the live counters
    ///
    /// Lets callers keep observing counts after the decorator has been moved
    /// into a [`FileSystemPtr`](crate::traits::FileSystemPtr).
    #[must_use]
    pub fn stats(&self) -> Arc<OperationStats> {
        Arc::clone(&self.stats)
    }

    /// Snapshot of the counters
    #[must_use]
    pub fn counts(&self) -> OperationCounts {
        self.stats.snapshot()
    }

    fn observe<T>(&self, op: &str, path: &str, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => debug!(backend = self.inner.name(), "{} {}: ok", op, path),
            Err(e) => {
                self.stats.increment_errors();
                warn!(backend = self.inner.name(), "{} {} failed: {}", op, path, e);
            }
        }
        result
    }
}

impl<F: FileSystem> FileSystem for InstrumentedFileSystem<F> {
    async fn read(&self, path: &str) -> Result<IoBuffer> {
        let result = self.inner.read(path).await;
        match &result {
            Ok(data) => self.stats.record_read(data.len() as u64),
            Err(_) => self.stats.increment_reads(),
        }
        self.observe("read", path, result)
    }

    async fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        let result = self.inner.write(path, data).await;
        if result.is_ok() {
            self.stats.record_write(data.len() as u64);
        } else {
            self.stats.increment_writes();
        }
        self.observe("write", path, result)
    }

    async fn move_file(&self, from: &str, to: &str) -> Result<()> {
        let result = self.inner.move_file(from, to).await;
        self.stats.increment_moves();
        self.observe("move", &format!("{from} -> {to}"), result)
    }

    async fn remove(&self, path: &str) -> Result<()> {
        let result = self.inner.remove(path).await;
        self.stats.increment_removes();
        self.observe("remove", path, result)
    }

    async fn stat(&self, path: &str) -> Result<StatResult> {
        let result = self.inner.stat(path).await;
        self.stats.increment_stats();
        self.observe("stat", path, result)
    }

    fn resolve(&self, path: &str) -> String {
        self.inner.resolve(path)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

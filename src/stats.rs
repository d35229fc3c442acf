//! Statistics tracking for filesystem port operations
//!
//! This module provides lock-free atomic statistics tracking using `OperationStats`.
//! Statistics can be safely shared across threads without requiring mutexes.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of operation counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationCounts {
    /// Completed `read` calls (successful or not)
    pub reads: u64,
    /// Completed `write` calls
    pub writes: u64,
    /// Completed `move_file` calls
    pub moves: u64,
    /// Completed `remove` calls
    pub removes: u64,
    /// Completed `stat` calls
    pub stats: u64,
    /// Calls that returned an error
    pub errors: u64,
    /// Bytes returned by successful reads
    pub bytes_read: u64,
    /// Bytes accepted by successful writes
    pub bytes_written: u64,
}

impl OperationCounts {
    /// Total number of asynchronous operations
    #[must_use]
    pub const fn total_operations(&self) -> u64 {
        self.reads + self.writes + self.moves + self.removes + self.stats
    }
}

/// Statistics tracking with interior mutability via atomics
///
/// # Thread Safety
///
/// All methods are thread-safe and lock-free. Atomic operations use `Ordering::Relaxed`
/// since statistics counters don't require synchronization (eventual consistency is fine).
///
/// # Usage
///
/// ```rust,ignore
/// let stats = OperationStats::new();
/// stats.record_read(1024);
/// assert_eq!(stats.snapshot().bytes_read, 1024);
/// ```
#[derive(Debug, Default)]
pub struct OperationStats {
    reads: AtomicU64,
    writes: AtomicU64,
    moves: AtomicU64,
    removes: AtomicU64,
    stats: AtomicU64,
    errors: AtomicU64,
    bytes_read: AtomicU64,
    bytes_written: AtomicU64,
}

impl OperationStats {
    /// Create zeroed counters
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful read of `bytes` bytes
    pub fn record_read(&self, bytes: u64) {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a successful write of `bytes` bytes
    pub fn record_write(&self, bytes: u64) {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Increment the move counter
    pub fn increment_moves(&self) {
        self.moves.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the remove counter
    pub fn increment_removes(&self) {
        self.removes.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the stat counter
    pub fn increment_stats(&self) {
        self.stats.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the read counter without adding bytes (failed read)
    pub fn increment_reads(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the write counter without adding bytes (failed write)
    pub fn increment_writes(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the error counter
    pub fn increment_errors(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters
    ///
    /// Each counter is loaded independently, so a snapshot taken while
    /// operations are in flight may mix before/after values.
    #[must_use]
    pub fn snapshot(&self) -> OperationCounts {
        OperationCounts {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            moves: self.moves.load(Ordering::Relaxed),
            removes: self.removes.load(Ordering::Relaxed),
            stats: self.stats.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
        }
    }
}

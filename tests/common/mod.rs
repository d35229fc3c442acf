//! Shared helpers for integration tests

use fsport::{LocalFileSystem, MemoryFileSystem};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// How long a test waits for a callback before failing
pub const CALLBACK_TIMEOUT: Duration = Duration::from_secs(10);

/// Local backend rooted in a fresh temporary directory
///
/// The `TempDir` must outlive the filesystem.
#[allow(dead_code)]
pub fn local_fixture() -> anyhow::Result<(TempDir, LocalFileSystem)> {
    let temp_dir = TempDir::new()?;
    let fs = LocalFileSystem::with_base_dir(temp_dir.path())?;
    Ok((temp_dir, fs))
}

/// Empty in-memory backend
#[allow(dead_code)]
pub fn memory_fixture() -> MemoryFileSystem {
    MemoryFileSystem::new()
}

/// Counting test double for completion callbacks
///
/// Every invocation is counted and its payload forwarded over a channel, so
/// a test can both wait for completion and check that it happened once.
#[allow(dead_code)]
pub struct CallbackProbe<T> {
    calls: Arc<AtomicUsize>,
    sender: Sender<T>,
    receiver: Receiver<T>,
}

#[allow(dead_code)]
impl<T: Send + 'static> CallbackProbe<T> {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            sender,
            receiver,
        }
    }

    /// Callback that records its payload
    pub fn recorder(&self) -> impl FnOnce(T) + Send + 'static {
        let calls = Arc::clone(&self.calls);
        let sender = self.sender.clone();
        move |payload| {
            calls.fetch_add(1, Ordering::SeqCst);
            // The probe may already be gone if the test failed
            let _ = sender.send(payload);
        }
    }

    /// Wait for the first payload
    pub fn wait(&self) -> T {
        match self.receiver.recv_timeout(CALLBACK_TIMEOUT) {
            Ok(payload) => payload,
            Err(e) => panic!("callback did not fire within {CALLBACK_TIMEOUT:?}: {e}"),
        }
    }

    /// Number of times the callback fired so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Assert no further invocation arrives within a grace period
    pub fn assert_fired_once(&self) {
        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(self.calls(), 1, "callback must fire exactly once");
        assert!(self.receiver.try_recv().is_err());
    }
}

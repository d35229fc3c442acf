//! Completion-callback surface over the async port
//!
//! Embedders that cannot poll futures drive a filesystem through
//! [`CallbackFileSystem`]: each call returns immediately and its callback is
//! invoked exactly once, later, on a worker thread. Failures travel only as a
//! non-empty error string; success is the empty string.
//!
//! # Architecture
//!
//! - `CallbackOptions` - worker pool configuration (owned by this module)
//! - `CallbackFileSystem` - dispatches each operation to compio's dispatcher,
//!   whose workers each run their own runtime
//! - `Completion` - guard that fires its callback exactly once, with an error
//!   if the job is dropped before it runs

use crate::error::{error_string, FsError, Result};
use crate::traits::{FileSystemPtr, IoBuffer, StatResult};
use compio::dispatcher::Dispatcher;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, warn};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Worker pool configuration for [`CallbackFileSystem`]
///
/// Uses `NonZeroUsize` to guarantee at compile-time that the pool has at
/// least one worker.
#[derive(Debug, Clone)]
pub struct CallbackOptions {
    worker_threads: NonZeroUsize,
}

impl CallbackOptions {
    /// Create options with `worker_threads` workers (0 is clamped to 1)
    #[must_use]
    pub fn new(worker_threads: usize) -> Self {
        Self {
            worker_threads: NonZeroUsize::new(worker_threads).unwrap_or(NonZeroUsize::MIN),
        }
    }

    /// Get the worker count
    #[must_use]
    pub const fn worker_threads(&self) -> usize {
        self.worker_threads.get()
    }
}

impl Default for CallbackOptions {
    /// One worker per CPU core
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

// ============================================================================
// COMPLETION GUARD
// ============================================================================

type BoxedCallback<T> = Box<dyn FnOnce(T, String) + Send>;

/// Exactly-once wrapper around a completion callback
///
/// Dropping an unfired `Completion` invokes the callback with `T::default()`
/// and an error, so no code path can lose a callback.
pub struct Completion<T: Default> {
    operation: &'static str,
    callback: Option<BoxedCallback<T>>,
}

impl<T: Default> Completion<T> {
    /// Wrap `callback` for the named operation
    pub fn new<C>(operation: &'static str, callback: C) -> Self
    where
        C: FnOnce(T, String) + Send + 'static,
    {
        Self {
            operation,
            callback: Some(Box::new(callback)),
        }
    }

    /// Fire the callback with a value and an error string
    pub fn complete(mut self, value: T, error: String) {
        if let Some(callback) = self.callback.take() {
            callback(value, error);
        }
    }

    /// Fire the callback from an operation result
    ///
    /// A failed result delivers `T::default()` alongside the error text.
    pub fn complete_with(self, result: Result<T>) {
        let error = error_string(&result);
        self.complete(result.unwrap_or_default(), error);
    }
}

impl<T: Default> Drop for Completion<T> {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            let error = FsError::Other(format!(
                "{} was abandoned before it completed",
                self.operation
            ));
            callback(T::default(), error.to_string());
        }
    }
}

// ============================================================================
// ADAPTER
// ============================================================================

/// Callback-driven front end for a shared filesystem
///
/// # Guarantees
///
/// - Every callback fires exactly once, including on failure and when the
///   adapter is torn down with the job still queued.
/// - The call returns before or after the callback has fired; callers must
///   not rely on either.
/// - Operations are not cancellable and are not ordered relative to each
///   other, even on the same path. Ordering is whatever the wrapped
///   filesystem guarantees for concurrent calls.
pub struct CallbackFileSystem {
    fs: FileSystemPtr,
    dispatcher: Dispatcher,
}

impl CallbackFileSystem {
    /// Start the worker pool and wrap `fs`
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` if the worker threads cannot be started.
    pub fn new(fs: FileSystemPtr, options: &CallbackOptions) -> Result<Self> {
        let dispatcher = Dispatcher::builder()
            .worker_threads(options.worker_threads)
            .build()
            .map_err(|e| FsError::Io {
                path: String::new(),
                source: e,
            })?;
        debug!(
            "Started {} callback worker(s) for {} filesystem",
            options.worker_threads(),
            fs.backend_name()
        );
        Ok(Self { fs, dispatcher })
    }

    /// Shared handle to the wrapped filesystem
    #[must_use]
    pub const fn filesystem(&self) -> &FileSystemPtr {
        &self.fs
    }

    /// Read a file; `callback` receives the contents and an error string
    pub fn read<C>(&self, path: impl Into<String>, callback: C)
    where
        C: FnOnce(IoBuffer, String) + Send + 'static,
    {
        let completion = Completion::new("read", callback);
        let fs = Arc::clone(&self.fs);
        let path = path.into();
        self.submit("read", move || async move {
            completion.complete_with(fs.read_boxed(&path).await);
        });
    }

    /// Write a file; `data` is copied before this call returns
    pub fn write<C>(&self, path: impl Into<String>, data: &[u8], callback: C)
    where
        C: FnOnce(String) + Send + 'static,
    {
        let completion = Completion::new("write", move |(): (), error: String| callback(error));
        let fs = Arc::clone(&self.fs);
        let path = path.into();
        let data = data.to_vec();
        self.submit("write", move || async move {
            completion.complete_with(fs.write_boxed(&path, &data).await);
        });
    }

    /// Move a file; `callback` receives an error string
    pub fn move_file<C>(&self, from: impl Into<String>, to: impl Into<String>, callback: C)
    where
        C: FnOnce(String) + Send + 'static,
    {
        let completion = Completion::new("move", move |(): (), error: String| callback(error));
        let fs = Arc::clone(&self.fs);
        let from = from.into();
        let to = to.into();
        self.submit("move", move || async move {
            completion.complete_with(fs.move_file_boxed(&from, &to).await);
        });
    }

    /// Remove a file; `callback` receives an error string
    pub fn remove<C>(&self, path: impl Into<String>, callback: C)
    where
        C: FnOnce(String) + Send + 'static,
    {
        let completion = Completion::new("remove", move |(): (), error: String| callback(error));
        let fs = Arc::clone(&self.fs);
        let path = path.into();
        self.submit("remove", move || async move {
            completion.complete_with(fs.remove_boxed(&path).await);
        });
    }

    /// Stat a path; `callback` receives the result and an error string
    ///
    /// A missing path is reported as `exists == false` with an empty error.
    pub fn stat<C>(&self, path: impl Into<String>, callback: C)
    where
        C: FnOnce(StatResult, String) + Send + 'static,
    {
        let completion = Completion::new("stat", callback);
        let fs = Arc::clone(&self.fs);
        let path = path.into();
        self.submit("stat", move || async move {
            completion.complete_with(fs.stat_boxed(&path).await);
        });
    }

    /// Resolve a path synchronously
    #[must_use]
    pub fn resolve(&self, path: &str) -> String {
        self.fs.resolve_path(path)
    }

    fn submit<J, Fut>(&self, operation: &'static str, job: J)
    where
        J: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        // A rejected job is dropped here, which fires its completion guard
        if self.dispatcher.dispatch(job).is_err() {
            warn!("Failed to dispatch {} to a worker", operation);
        }
    }
}

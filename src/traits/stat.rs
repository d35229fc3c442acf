//! `StatResult` value type describing one filesystem entry
//!
//! A `StatResult` is a point-in-time snapshot. The default value means
//! "nothing known": the entry does not exist and every other field is zero.

use std::time::{SystemTime, UNIX_EPOCH};

/// Information about a filesystem entry at a point in time
///
/// `is_directory` and `is_file` may both be `false` for an existing entry
/// that is neither a regular file nor a directory (device, socket, fifo).
///
/// # Examples
///
/// ```rust
/// use fsport::StatResult;
///
/// let missing = StatResult::default();
/// assert!(!missing.exists);
/// assert_eq!(missing.last_modified, 0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StatResult {
    /// The path resolves to an entry
    pub exists: bool,
    /// The entry is a directory
    pub is_directory: bool,
    /// The entry is a regular file
    pub is_file: bool,
    /// POSIX time (seconds, UTC) of the last modification
    pub last_modified: i64,
}

impl StatResult {
    /// Result for an existing regular file
    #[must_use]
    pub const fn file(last_modified: i64) -> Self {
        Self {
            exists: true,
            is_directory: false,
            is_file: true,
            last_modified,
        }
    }

    /// Result for an existing directory
    #[must_use]
    pub const fn directory(last_modified: i64) -> Self {
        Self {
            exists: true,
            is_directory: true,
            is_file: false,
            last_modified,
        }
    }

    /// Build a result for an existing entry from OS metadata fields
    ///
    /// A modification time the platform cannot report is recorded as 0.
    #[must_use]
    pub fn from_entry(is_directory: bool, is_file: bool, modified: Option<SystemTime>) -> Self {
        Self {
            exists: true,
            is_directory,
            is_file,
            last_modified: modified.map_or(0, posix_seconds),
        }
    }

    /// Get the entry type as a string (e.g., "file", "directory", "missing")
    #[must_use]
    pub const fn file_type(&self) -> &'static str {
        if !self.exists {
            "missing"
        } else if self.is_directory {
            "directory"
        } else if self.is_file {
            "file"
        } else {
            "special"
        }
    }
}

/// Convert a `SystemTime` into POSIX seconds
///
/// Times before the epoch produce negative values.
#[must_use]
pub fn posix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_secs()).map_or(i64::MIN, |secs| -secs),
    }
}

/// Current POSIX time in seconds
#[must_use]
pub fn now_posix_seconds() -> i64 {
    posix_seconds(SystemTime::now())
}

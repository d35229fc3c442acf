//! In-memory filesystem backend
//!
//! A complete implementer of the port that keeps every entry in a map. It is
//! the test double for consumers of the port and the store of choice for
//! embedders without a writable disk.
//!
//! # Semantics
//!
//! - Paths are `/`-separated and resolved against a working directory
//!   (default `/`). The root always exists.
//! - All operations take one lock, so each is atomic with respect to every
//!   other operation and concurrent operations on a path are serialized.
//! - `write` creates missing parent directories.
//! - `move_file` moves files and whole directory trees and overwrites an
//!   existing destination file; it never overwrites a directory.
//! - `remove` deletes a file or an empty directory; a missing path is an error.
//! - A trailing `/` (`name/`) only ever matches a directory.

use crate::error::{FsError, Result};
use crate::paths::{
    has_trailing_separator, is_virtual_descendant, resolve_virtual, virtual_parent,
};
use crate::traits::{now_posix_seconds, FileSystem, IoBuffer, StatResult};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

#[derive(Debug, Clone)]
enum Node {
    File { data: Vec<u8>, modified: i64 },
    Directory { modified: i64 },
}

impl Node {
    const fn stat(&self) -> StatResult {
        match self {
            Self::File { modified, .. } => StatResult::file(*modified),
            Self::Directory { modified } => StatResult::directory(*modified),
        }
    }

    const fn is_directory(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }
}

type Nodes = BTreeMap<String, Node>;

/// In-memory filesystem backend
#[derive(Debug)]
pub struct MemoryFileSystem {
    working_dir: String,
    nodes: Mutex<Nodes>,
}

impl MemoryFileSystem {
    /// Create an empty store whose working directory is `/`
    #[must_use]
    pub fn new() -> Self {
        Self::with_working_dir("/")
    }

    /// Create an empty store resolving relative paths against `working_dir`
    ///
    /// The working directory itself is not created.
    #[must_use]
    pub fn with_working_dir(working_dir: &str) -> Self {
        let mut nodes = Nodes::new();
        nodes.insert(
            "/".to_string(),
            Node::Directory {
                modified: now_posix_seconds(),
            },
        );
        Self {
            working_dir: resolve_virtual("/", working_dir),
            nodes: Mutex::new(nodes),
        }
    }

    /// Create a directory and any missing parents
    ///
    /// Succeeds if the directory already exists.
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError::NotADirectory)` if the path or one of its
    /// ancestors is a file.
    pub fn create_dir(&self, path: &str) -> Result<()> {
        let path = self.absolute(path);
        let mut nodes = self.lock()?;
        ensure_directory(&mut nodes, &path)
    }

    /// Number of entries, excluding the root
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` if the store's lock is poisoned.
    pub fn entry_count(&self) -> Result<usize> {
        Ok(self.lock()?.len() - 1)
    }

    fn absolute(&self, path: &str) -> String {
        resolve_virtual(&self.working_dir, path)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Nodes>> {
        self.nodes
            .lock()
            .map_err(|_| FsError::Other("In-memory filesystem lock poisoned".to_string()))
    }
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Make sure `path` and all its ancestors are directories, creating as needed
fn ensure_directory(nodes: &mut Nodes, path: &str) -> Result<()> {
    match nodes.get(path) {
        Some(Node::Directory { .. }) => return Ok(()),
        Some(Node::File { .. }) => {
            return Err(FsError::NotADirectory {
                path: path.to_string(),
            })
        }
        None => {}
    }
    if let Some(parent) = virtual_parent(path) {
        ensure_directory(nodes, parent)?;
    }
    nodes.insert(
        path.to_string(),
        Node::Directory {
            modified: now_posix_seconds(),
        },
    );
    Ok(())
}

/// Require the parent of `path` to be an existing directory
fn require_parent_directory(nodes: &Nodes, path: &str) -> Result<()> {
    let Some(parent) = virtual_parent(path) else {
        return Ok(());
    };
    match nodes.get(parent) {
        Some(Node::Directory { .. }) => Ok(()),
        Some(Node::File { .. }) => Err(FsError::NotADirectory {
            path: parent.to_string(),
        }),
        None => Err(FsError::NotFound {
            path: parent.to_string(),
        }),
    }
}

/// Keys of every entry strictly below `dir`
fn descendants(nodes: &Nodes, dir: &str) -> Vec<String> {
    let prefix = if dir == "/" {
        "/".to_string()
    } else {
        format!("{dir}/")
    };
    nodes
        .range(prefix.clone()..)
        .take_while(|(key, _)| key.starts_with(&prefix))
        .filter(|(key, _)| is_virtual_descendant(key, dir))
        .map(|(key, _)| key.clone())
        .collect()
}

impl FileSystem for MemoryFileSystem {
    async fn read(&self, path: &str) -> Result<IoBuffer> {
        let trailing = has_trailing_separator(path);
        let path = self.absolute(path);
        let nodes = self.lock()?;
        match nodes.get(&path) {
            Some(Node::File { .. }) if trailing => Err(FsError::NotADirectory { path }),
            Some(Node::File { data, .. }) => Ok(data.clone()),
            Some(Node::Directory { .. }) => Err(FsError::IsADirectory { path }),
            None => Err(FsError::NotFound { path }),
        }
    }

    async fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        let trailing = has_trailing_separator(path);
        let path = self.absolute(path);
        let mut nodes = self.lock()?;

        if trailing || nodes.get(&path).is_some_and(Node::is_directory) {
            return Err(FsError::IsADirectory { path });
        }
        if let Some(parent) = virtual_parent(&path) {
            ensure_directory(&mut nodes, parent)?;
        }

        debug!("memory: wrote {} ({} bytes)", path, data.len());
        nodes.insert(
            path,
            Node::File {
                data: data.to_vec(),
                modified: now_posix_seconds(),
            },
        );
        Ok(())
    }

    async fn move_file(&self, from: &str, to: &str) -> Result<()> {
        let trailing = has_trailing_separator(from) || has_trailing_separator(to);
        let from = self.absolute(from);
        let to = self.absolute(to);
        let mut nodes = self.lock()?;

        let Some(source) = nodes.get(&from) else {
            return Err(FsError::NotFound { path: from });
        };
        if from == "/" {
            return Err(FsError::Other("Cannot move the root directory".to_string()));
        }
        let source_is_directory = source.is_directory();
        if trailing && !source_is_directory {
            return Err(FsError::NotADirectory { path: from });
        }
        if from == to {
            return Ok(());
        }
        if source_is_directory && is_virtual_descendant(&to, &from) {
            return Err(FsError::Other(format!(
                "Cannot move directory {from} into itself ({to})"
            )));
        }
        match nodes.get(&to) {
            Some(Node::Directory { .. }) => return Err(FsError::AlreadyExists { path: to }),
            Some(Node::File { .. }) if source_is_directory => {
                return Err(FsError::NotADirectory { path: to })
            }
            _ => {}
        }
        require_parent_directory(&nodes, &to)?;

        let mut moved = descendants(&nodes, &from);
        moved.push(from.clone());
        for old_key in moved {
            if let Some(node) = nodes.remove(&old_key) {
                let new_key = format!("{to}{}", &old_key[from.len()..]);
                nodes.insert(new_key, node);
            }
        }

        debug!("memory: moved {} to {}", from, to);
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<()> {
        let trailing = has_trailing_separator(path);
        let path = self.absolute(path);
        let mut nodes = self.lock()?;

        match nodes.get(&path) {
            None => return Err(FsError::NotFound { path }),
            Some(Node::File { .. }) if trailing => return Err(FsError::NotADirectory { path }),
            Some(Node::Directory { .. }) if path == "/" => {
                return Err(FsError::PermissionDenied { path })
            }
            Some(Node::Directory { .. }) if !descendants(&nodes, &path).is_empty() => {
                return Err(FsError::DirectoryNotEmpty { path })
            }
            Some(_) => {}
        }

        nodes.remove(&path);
        debug!("memory: removed {}", path);
        Ok(())
    }

    async fn stat(&self, path: &str) -> Result<StatResult> {
        let trailing = has_trailing_separator(path);
        let path = self.absolute(path);
        let nodes = self.lock()?;
        Ok(nodes
            .get(&path)
            .filter(|node| node.is_directory() || !trailing)
            .map(Node::stat)
            .unwrap_or_default())
    }

    fn resolve(&self, path: &str) -> String {
        self.absolute(path)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

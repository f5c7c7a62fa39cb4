//! Filesystem Listing and File Access Abstractions
//!
//! The engine only needs three filesystem capabilities: listing a
//! directory, reading a small text file whole, and querying a file's byte
//! size. They are split into two traits because the tree scanner only
//! lists, while the probe orchestrator only reads and stats.

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Entry name relative to the listed directory (no path separators)
    pub name: String,
    /// Whether the entry is itself a directory
    pub is_directory: bool,
}

/// Directory enumeration capability
#[async_trait]
pub trait DirectoryLister: Send + Sync {
    /// List the immediate entries of a directory.
    ///
    /// # Errors
    ///
    /// Fails with a recoverable error when the directory cannot be listed
    /// (missing, permission denied, transient I/O). Callers are expected
    /// to log and skip, not abort.
    async fn list_entries(&self, path: &Path) -> Result<Vec<DirEntry>>;
}

/// File read and size-query capability
#[async_trait]
pub trait FileAccess: Send + Sync {
    /// Read an entire file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Fails when the file is missing or unreadable.
    async fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Byte size of a file, or `None` when the size cannot be determined
    /// (e.g. the path does not exist or is not a regular file).
    async fn file_size(&self, path: &Path) -> Result<Option<u64>>;

    /// Check whether a path exists.
    async fn exists(&self, path: &Path) -> Result<bool>;
}

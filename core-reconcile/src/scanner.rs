//! Pointer-File Tree Scanner
//!
//! Walks one or more root directories depth-first and collects the paths
//! of pointer files (matched by extension, case-insensitively). Within a
//! directory, matching files are collected before any subdirectory is
//! descended into; beyond that no ordering is guaranteed.
//!
//! A directory that cannot be listed is logged and skipped; scanning
//! continues with siblings and other roots. Cancellation is checked
//! between directory visits, so a cancelled scan returns the partial
//! result collected so far, which remains valid work.

use bridge_traits::fs::DirectoryLister;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Recursive scanner for pointer files under a set of roots
pub struct TreeScanner {
    lister: Arc<dyn DirectoryLister>,
    /// Lowercase extension without the leading dot
    extension: String,
}

impl TreeScanner {
    /// Create a scanner for the given pointer-file extension.
    ///
    /// The extension is matched case-insensitively; a leading dot is
    /// accepted and stripped.
    pub fn new(lister: Arc<dyn DirectoryLister>, extension: &str) -> Self {
        Self {
            lister,
            extension: extension.trim_start_matches('.').to_lowercase(),
        }
    }

    /// Scan the given roots and return every pointer-file path found.
    ///
    /// Roots are deduplicated before scanning. On cancellation the scan
    /// stops between directory visits and returns what it has.
    pub async fn scan(&self, roots: &[PathBuf], cancel: &CancellationToken) -> Vec<PathBuf> {
        let mut found = Vec::new();
        let mut seen_roots = HashSet::new();

        for root in roots {
            if !seen_roots.insert(root.clone()) {
                debug!(root = ?root, "Skipping duplicate root");
                continue;
            }
            if cancel.is_cancelled() {
                break;
            }
            self.scan_root(root, cancel, &mut found).await;
        }

        found
    }

    /// Depth-first walk of a single root using an explicit stack
    async fn scan_root(
        &self,
        root: &Path,
        cancel: &CancellationToken,
        found: &mut Vec<PathBuf>,
    ) {
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            if cancel.is_cancelled() {
                debug!(root = ?root, "Scan cancelled");
                return;
            }

            let entries = match self.lister.list_entries(&dir).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(dir = ?dir, error = %e, "Could not list directory, skipping");
                    continue;
                }
            };

            let mut subdirs = Vec::new();
            for entry in entries {
                let path = dir.join(&entry.name);
                if entry.is_directory {
                    subdirs.push(path);
                } else if self.matches_extension(&entry.name) {
                    found.push(path);
                }
            }

            // Reverse so the stack pops subdirectories in listing order
            pending.extend(subdirs.into_iter().rev());
        }
    }

    fn matches_extension(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}

//! Pointer-File Target Resolution
//!
//! A pointer file's entire trimmed content is one path or URL string.
//! Resolution reads the file and returns that string verbatim; no URL
//! parsing or validation happens here, the probing collaborator owns
//! protocol handling. Content is re-read on every run because it can
//! change between runs.

use crate::error::{ReconcileError, Result};
use bridge_traits::fs::FileAccess;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Resolves a pointer file to the target path/URL it references
pub struct PathResolver {
    files: Arc<dyn FileAccess>,
}

impl PathResolver {
    pub fn new(files: Arc<dyn FileAccess>) -> Self {
        Self { files }
    }

    /// Read a pointer file and return its trimmed content.
    ///
    /// # Errors
    ///
    /// Fails with [`ReconcileError::UnreadablePointer`] if the file
    /// disappeared or became unreadable between discovery and resolution.
    /// This is a per-item error, never fatal to a run.
    pub async fn resolve(&self, pointer: &Path) -> Result<String> {
        let content = self.files.read_to_string(pointer).await.map_err(|e| {
            ReconcileError::UnreadablePointer {
                path: pointer.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        let target = content.trim().to_string();
        debug!(pointer = ?pointer, target = %target, "Resolved pointer file");
        Ok(target)
    }
}

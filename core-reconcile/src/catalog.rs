//! Catalog Bridge
//!
//! Thin adapter over the external [`MediaCatalog`] collaborator. All
//! durability concerns live here: the orchestrator produces updated
//! entries but never persists them itself.
//!
//! A persist is a full-entry overwrite based on state read at
//! classification time. The gap between lookup and persist is a known
//! race window with other catalog writers; acceptable because
//! reconciliation is idempotent and self-correcting on the next run.

use crate::error::{ReconcileError, Result};
use bridge_traits::catalog::{CatalogEntry, MediaCatalog};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Adapter between the engine and the external catalog
pub struct CatalogBridge {
    catalog: Arc<dyn MediaCatalog>,
}

impl CatalogBridge {
    pub fn new(catalog: Arc<dyn MediaCatalog>) -> Self {
        Self { catalog }
    }

    /// Look up the catalog entry for a pointer-file path.
    ///
    /// `Ok(None)` means the catalog has no entry for the path; such paths
    /// are dropped from the run (the engine never creates entries).
    pub async fn lookup(&self, path: &Path) -> Result<Option<CatalogEntry>> {
        self.catalog
            .find_entry_by_path(path)
            .await
            .map_err(|e| ReconcileError::Catalog(e.to_string()))
    }

    /// Persist one updated entry.
    ///
    /// The underlying `save_entries` is best-effort idempotent, so a retry
    /// after an ambiguous failure is safe. A failure leaves the entry's
    /// in-catalog state untouched.
    pub async fn persist(&self, entry: &CatalogEntry) -> Result<()> {
        self.catalog
            .save_entries(std::slice::from_ref(entry))
            .await
            .map_err(|e| ReconcileError::Persist {
                path: entry.path.display().to_string(),
                reason: e.to_string(),
            })?;

        debug!(path = ?entry.path, "Persisted catalog entry");
        Ok(())
    }
}

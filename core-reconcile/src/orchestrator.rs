//! Probe Orchestration
//!
//! For entries the classifier selected, performs the actual work: resolve
//! the pointer target, invoke the external prober, and merge the result
//! into an updated entry. The orchestrator never persists; updated
//! entries go back through the catalog bridge so all durability concerns
//! stay in one place.
//!
//! ## Merge rules (probe path)
//!
//! - The stream list is replaced wholesale with the probe result. Partial
//!   old data must not survive next to new data.
//! - Duration is set only when the probe reports one.
//! - Size prefers a direct filesystem query of the resolved target and
//!   falls back to the prober's media-source description (the only option
//!   for URL targets). When neither yields a positive value the size is
//!   left unset; streams are still committed.

use crate::error::{ReconcileError, Result};
use crate::resolver::PathResolver;
use bridge_traits::catalog::{CatalogEntry, StreamKind};
use bridge_traits::fs::FileAccess;
use bridge_traits::probe::{MediaProbe, ProbeRequest};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of the size-only path
#[derive(Debug, Clone, PartialEq)]
pub enum SizeOnlyOutcome {
    /// Size differed; the returned entry carries the new value
    Updated(CatalogEntry),
    /// Size already matched or could not be determined; nothing to persist
    NoChange,
}

/// Performs probe and size-only updates against resolved targets
pub struct ProbeOrchestrator {
    resolver: PathResolver,
    files: Arc<dyn FileAccess>,
    probe: Arc<dyn MediaProbe>,
}

impl ProbeOrchestrator {
    pub fn new(files: Arc<dyn FileAccess>, probe: Arc<dyn MediaProbe>) -> Self {
        Self {
            resolver: PathResolver::new(files.clone()),
            files,
            probe,
        }
    }

    /// Probe the entry's target and merge streams, duration, and size
    /// into an updated copy of the entry.
    pub async fn probe_and_update(&self, entry: &CatalogEntry) -> Result<CatalogEntry> {
        let target = self.resolve_existing_target(entry).await?;

        let before_streams = entry.streams.len();
        let result = self
            .probe
            .probe(&target, ProbeRequest::default())
            .await
            .map_err(|e| ReconcileError::Probe {
                target: target.clone(),
                reason: e.to_string(),
            })?;

        let mut updated = entry.clone();
        updated.streams = result.streams;
        if result.run_time_ticks.is_some() {
            updated.run_time_ticks = result.run_time_ticks;
        }
        updated.size = match self.direct_size(&target).await {
            Some(size) => Some(size),
            None => result.reported_size.filter(|s| *s > 0),
        };

        let has_video = updated.has_stream(StreamKind::Video);
        let has_audio = updated.has_stream(StreamKind::Audio);
        info!(
            name = %entry.display_name(),
            streams_before = before_streams,
            streams_after = updated.streams.len(),
            has_video,
            has_audio,
            "Probe done"
        );
        if !has_video || !has_audio {
            warn!(name = %entry.display_name(), "Entry may still lack full media info");
        }

        Ok(updated)
    }

    /// Refresh only the entry's size from the resolved target.
    ///
    /// Returns [`SizeOnlyOutcome::NoChange`] when the target's size equals
    /// the recorded one (avoids a redundant persist) or when no direct
    /// size query is possible, e.g. for URL targets.
    pub async fn update_size_only(&self, entry: &CatalogEntry) -> Result<SizeOnlyOutcome> {
        let target = self.resolve_existing_target(entry).await?;

        let Some(size) = self.direct_size(&target).await else {
            debug!(target = %target, "No direct size available, leaving entry unchanged");
            return Ok(SizeOnlyOutcome::NoChange);
        };

        if entry.size == Some(size) {
            return Ok(SizeOnlyOutcome::NoChange);
        }

        let mut updated = entry.clone();
        updated.size = Some(size);
        debug!(
            name = %entry.display_name(),
            old = ?entry.size,
            new = size,
            "Size updated from target"
        );
        Ok(SizeOnlyOutcome::Updated(updated))
    }

    /// Resolve the pointer and verify a local target still exists.
    ///
    /// URL targets skip the existence check; the prober owns protocol
    /// handling and will fail on its own if the resource is gone.
    async fn resolve_existing_target(&self, entry: &CatalogEntry) -> Result<String> {
        let target = self.resolver.resolve(&entry.path).await?;

        if !is_remote(&target) {
            let exists = match self.files.exists(Path::new(&target)).await {
                Ok(exists) => exists,
                Err(e) => {
                    warn!(target = %target, error = %e, "Existence check failed");
                    false
                }
            };
            if !exists {
                return Err(ReconcileError::TargetUnresolvable {
                    path: entry.path.display().to_string(),
                    target,
                });
            }
        }

        Ok(target)
    }

    /// Positive byte size from a direct filesystem query, local targets only
    async fn direct_size(&self, target: &str) -> Option<u64> {
        if is_remote(target) {
            return None;
        }
        match self.files.file_size(Path::new(target)).await {
            Ok(size) => size.filter(|s| *s > 0),
            Err(e) => {
                warn!(target = %target, error = %e, "Size query failed");
                None
            }
        }
    }
}

/// Targets with a URL scheme are not on the local filesystem
fn is_remote(target: &str) -> bool {
    target.contains("://")
}

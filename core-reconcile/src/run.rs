//! # Reconciliation Run
//!
//! Top-level driver with validated state transitions.
//!
//! ## State machine
//!
//! ```text
//! Idle → Discovering → Classifying → Processing → Completed
//!             ↓             ↓   ↓         ↓
//!             └──────→ Cancelled └───→ Completed (empty selection)
//! ```
//!
//! ## Workflow
//!
//! 1. Scan the roots for pointer files (`Discovering`)
//! 2. Resolve each path to its catalog entry; unknown paths are dropped
//! 3. Triage entries into probe / size-only / up-to-date buckets
//!    (`Classifying`)
//! 4. Process probe items strictly before size-only items, one at a time,
//!    with an inter-item delay (`Processing`)
//! 5. Report progress after every item; force 100 at the end whether the
//!    run completed or was cancelled
//!
//! Processing is deliberately sequential: the targets behind pointer
//! files are frequently remote and rate-limited, so the run trades
//! throughput for not tripping abuse detection. Per-item failures are
//! logged, counted, and never abort the run.

use crate::catalog::CatalogBridge;
use crate::classifier::{classify, Classification};
use crate::error::{ReconcileError, Result};
use crate::orchestrator::{ProbeOrchestrator, SizeOnlyOutcome};
use crate::scanner::TreeScanner;
use bridge_traits::catalog::{CatalogEntry, MediaCatalog};
use bridge_traits::fs::{DirectoryLister, FileAccess};
use bridge_traits::probe::MediaProbe;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Unique identifier for a reconciliation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Run configuration
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Pointer-file extension, matched case-insensitively
    pub pointer_extension: String,

    /// Pause after a probe before the next item. Probing a remote target
    /// is the expensive, rate-limited operation; keep this generous.
    pub probe_delay: Duration,

    /// Pause after a size-only update before the next item
    pub size_only_delay: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            pointer_extension: "strm".to_string(),
            probe_delay: Duration::from_millis(1000),
            size_only_delay: Duration::from_millis(250),
        }
    }
}

/// The current state of a reconciliation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Discovering,
    Classifying,
    Processing,
    Completed,
    Cancelled,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Completed | RunState::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Discovering => "discovering",
            RunState::Classifying => "classifying",
            RunState::Processing => "processing",
            RunState::Completed => "completed",
            RunState::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Counters aggregated over one run. Discarded at run end; the catalog is
/// the durable state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Pointer files found by the scanner
    pub discovered: u64,
    /// Discovered paths with no catalog entry, dropped
    pub missing_entries: u64,
    /// Entries classified as needing a full probe
    pub needs_probe: u64,
    /// Entries classified as needing a size refresh only
    pub needs_size_only: u64,
    /// Entries already complete, excluded from processing
    pub up_to_date: u64,
    /// Items processed and persisted successfully
    pub succeeded: u64,
    /// Items that failed (probe, resolution, lookup, or persist)
    pub failed: u64,
    /// Items that needed no persist (size already matched)
    pub skipped: u64,
    /// Final progress value, always exactly 100
    pub final_progress: f64,
    /// Wall-clock duration of the run in seconds
    pub duration_secs: u64,
}

/// Receiver for progress values in [0, 100].
///
/// Values are monotonically non-decreasing and terminate at exactly 100
/// whether the run completes or is cancelled.
pub trait ProgressSink: Send + Sync {
    fn report(&self, percent: f64);
}

impl<F> ProgressSink for F
where
    F: Fn(f64) + Send + Sync,
{
    fn report(&self, percent: f64) {
        self(percent)
    }
}

/// Monotonic clamp in front of the sink
struct ProgressReporter<'a> {
    sink: &'a dyn ProgressSink,
    last: f64,
}

impl<'a> ProgressReporter<'a> {
    fn new(sink: &'a dyn ProgressSink) -> Self {
        Self { sink, last: 0.0 }
    }

    fn report(&mut self, percent: f64) {
        let clamped = percent.clamp(0.0, 100.0);
        if clamped > self.last {
            self.last = clamped;
            self.sink.report(clamped);
        }
    }

    /// Force the terminal 100, emitted exactly once at run end
    fn finish(&mut self) {
        self.last = 100.0;
        self.sink.report(100.0);
    }
}

/// Outcome of reconciling a single entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Entry was updated and persisted
    Updated,
    /// Nothing to persist (size already matched the target)
    Unchanged,
    /// Entry was already complete; no work selected
    UpToDate,
    /// The path has no catalog entry; dropped
    NotCataloged,
}

/// Top-level reconciliation driver.
///
/// Collaborators are injected at construction; a run instance is
/// single-use for batch execution (`execute` transitions out of `Idle`)
/// but [`reconcile_path`](Self::reconcile_path) may be called any number
/// of times for real-time single-item triggering.
pub struct ReconciliationRun {
    id: RunId,
    config: RunConfig,
    scanner: TreeScanner,
    catalog: CatalogBridge,
    orchestrator: ProbeOrchestrator,
    state: RunState,
}

impl ReconciliationRun {
    pub fn new(
        config: RunConfig,
        lister: Arc<dyn DirectoryLister>,
        files: Arc<dyn FileAccess>,
        catalog: Arc<dyn MediaCatalog>,
        probe: Arc<dyn MediaProbe>,
    ) -> Self {
        let scanner = TreeScanner::new(lister, &config.pointer_extension);
        Self {
            id: RunId::new(),
            config,
            scanner,
            catalog: CatalogBridge::new(catalog),
            orchestrator: ProbeOrchestrator::new(files, probe),
            state: RunState::Idle,
        }
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute one full reconciliation pass over the given roots.
    ///
    /// Returns the run summary in every outcome short of caller misuse;
    /// cancellation and per-item failures are reflected in the summary,
    /// not surfaced as errors. Progress always terminates at exactly 100.
    ///
    /// # Errors
    ///
    /// Fails only when called on a run that already executed
    /// (invalid state transition).
    #[instrument(skip(self, roots, progress, cancel), fields(run_id = %self.id))]
    pub async fn execute(
        &mut self,
        roots: &[PathBuf],
        progress: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<RunSummary> {
        let started_at = chrono::Utc::now();
        let mut summary = RunSummary::default();
        let mut reporter = ProgressReporter::new(progress);

        info!("Starting pointer file scan");

        // Phase 1: Discover
        self.transition(RunState::Discovering)?;
        let paths = self.scanner.scan(roots, cancel).await;
        summary.discovered = paths.len() as u64;
        info!(count = paths.len(), "Found pointer files");

        let mut entries = Vec::new();
        for path in &paths {
            if cancel.is_cancelled() {
                return self.finish(RunState::Cancelled, summary, &mut reporter, started_at);
            }
            match self.catalog.lookup(path).await {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => {
                    warn!(path = ?path, "No catalog entry for pointer file, dropping");
                    summary.missing_entries += 1;
                }
                Err(e) => {
                    warn!(path = ?path, error = %e, "Catalog lookup failed");
                    summary.failed += 1;
                }
            }
        }

        if cancel.is_cancelled() {
            return self.finish(RunState::Cancelled, summary, &mut reporter, started_at);
        }

        // Phase 2: Classify
        self.transition(RunState::Classifying)?;
        let mut selected = Vec::new();
        let mut size_only = Vec::new();
        for entry in entries {
            match classify(&entry) {
                Classification::NeedsProbe => {
                    summary.needs_probe += 1;
                    selected.push((entry, Classification::NeedsProbe));
                }
                Classification::NeedsSizeOnly => {
                    summary.needs_size_only += 1;
                    size_only.push((entry, Classification::NeedsSizeOnly));
                }
                Classification::UpToDate => {
                    summary.up_to_date += 1;
                }
            }
        }
        // Probes first: they are the more valuable work if the run is
        // cancelled partway, and they fix size as a side effect.
        selected.extend(size_only);

        info!(
            needs_probe = summary.needs_probe,
            needs_size_only = summary.needs_size_only,
            up_to_date = summary.up_to_date,
            "Classification complete"
        );

        if cancel.is_cancelled() {
            return self.finish(RunState::Cancelled, summary, &mut reporter, started_at);
        }

        if selected.is_empty() {
            info!("Nothing to process, run complete");
            return self.finish(RunState::Completed, summary, &mut reporter, started_at);
        }

        // Phase 3: Process, strictly sequential with inter-item delay
        self.transition(RunState::Processing)?;
        let total = selected.len();
        let mut completed = 0usize;
        let mut cancelled_mid_batch = false;

        for (entry, classification) in &selected {
            if cancel.is_cancelled() {
                info!("Run cancelled, stopping before next item");
                cancelled_mid_batch = true;
                break;
            }

            debug!(name = %entry.display_name(), classification = %classification, "Processing entry");

            match self.process_entry(entry, *classification).await {
                Ok(ItemOutcome::Updated) => summary.succeeded += 1,
                Ok(ItemOutcome::Unchanged) => summary.skipped += 1,
                Ok(ItemOutcome::UpToDate | ItemOutcome::NotCataloged) => {}
                Err(e) => {
                    error!(
                        name = %entry.display_name(),
                        path = ?entry.path,
                        error = %e,
                        "Error processing entry"
                    );
                    summary.failed += 1;
                }
            }

            completed += 1;
            reporter.report(completed as f64 / total as f64 * 100.0);

            // No delay after the final item
            if completed < total {
                let delay = match classification {
                    Classification::NeedsProbe => self.config.probe_delay,
                    _ => self.config.size_only_delay,
                };
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = cancel.cancelled() => {}
                }
            }
        }

        let final_state = if cancelled_mid_batch {
            RunState::Cancelled
        } else {
            RunState::Completed
        };
        self.finish(final_state, summary, &mut reporter, started_at)
    }

    /// Reconcile a single pointer-file path.
    ///
    /// This is the real-time invocation path (e.g. an "item added" event
    /// from the host): a batch of size one through the same
    /// classify→probe→persist logic the batch run uses.
    #[instrument(skip(self), fields(run_id = %self.id))]
    pub async fn reconcile_path(&self, path: &Path) -> Result<ItemOutcome> {
        let Some(entry) = self.catalog.lookup(path).await? else {
            warn!(path = ?path, "No catalog entry for pointer file");
            return Ok(ItemOutcome::NotCataloged);
        };

        let classification = classify(&entry);
        if classification == Classification::UpToDate {
            debug!(name = %entry.display_name(), "Entry already complete, skipping");
            return Ok(ItemOutcome::UpToDate);
        }

        self.process_entry(&entry, classification).await
    }

    /// Shared per-item path: probe or size-patch, then persist
    async fn process_entry(
        &self,
        entry: &CatalogEntry,
        classification: Classification,
    ) -> Result<ItemOutcome> {
        match classification {
            Classification::NeedsProbe => {
                let updated = self.orchestrator.probe_and_update(entry).await?;
                self.catalog.persist(&updated).await?;
                Ok(ItemOutcome::Updated)
            }
            Classification::NeedsSizeOnly => {
                match self.orchestrator.update_size_only(entry).await? {
                    SizeOnlyOutcome::Updated(updated) => {
                        self.catalog.persist(&updated).await?;
                        Ok(ItemOutcome::Updated)
                    }
                    SizeOnlyOutcome::NoChange => Ok(ItemOutcome::Unchanged),
                }
            }
            Classification::UpToDate => Ok(ItemOutcome::UpToDate),
        }
    }

    /// Terminal bookkeeping shared by every exit path
    fn finish(
        &mut self,
        state: RunState,
        mut summary: RunSummary,
        reporter: &mut ProgressReporter<'_>,
        started_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<RunSummary> {
        self.transition(state)?;
        reporter.finish();
        summary.final_progress = 100.0;
        summary.duration_secs = (chrono::Utc::now() - started_at)
            .num_seconds()
            .max(0) as u64;

        info!(
            state = %state,
            discovered = summary.discovered,
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            duration_secs = summary.duration_secs,
            "Run finished"
        );
        Ok(summary)
    }

    /// Validate and apply a state transition
    fn transition(&mut self, to: RunState) -> Result<()> {
        let valid = match (self.state, to) {
            (RunState::Idle, RunState::Discovering) => true,

            (RunState::Discovering, RunState::Classifying) => true,
            (RunState::Discovering, RunState::Cancelled) => true,

            (RunState::Classifying, RunState::Processing) => true,
            // Empty selection completes without a processing phase
            (RunState::Classifying, RunState::Completed) => true,
            (RunState::Classifying, RunState::Cancelled) => true,

            (RunState::Processing, RunState::Completed) => true,
            (RunState::Processing, RunState::Cancelled) => true,

            _ => false,
        };

        if !valid {
            return Err(ReconcileError::InvalidStateTransition {
                from: self.state.as_str().to_string(),
                to: to.as_str().to_string(),
                reason: format!("Cannot transition from {} to {}", self.state, to),
            });
        }

        self.state = to;
        Ok(())
    }
}

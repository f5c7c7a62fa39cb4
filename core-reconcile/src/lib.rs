//! # Pointer-File Reconciliation Engine
//!
//! Reconciles lightweight pointer media files (text files whose content
//! is a path/URL to the actual media resource) against an external
//! metadata catalog, so each entry's stream list and byte size reflect
//! the real target.
//!
//! ## Components
//!
//! - **Tree Scanner** (`scanner`): recursive pointer-file discovery
//! - **Path Resolver** (`resolver`): pointer content → target path/URL
//! - **Classifier** (`classifier`): per-run triage of catalog entries
//! - **Catalog Bridge** (`catalog`): lookup and persistence adapter
//! - **Probe Orchestrator** (`orchestrator`): probe and size-only updates
//! - **Reconciliation Run** (`run`): sequential, rate-limited driver with
//!   a validated state machine, progress reporting, and cancellation
//! - **Task metadata** (`task`): declarative scheduling info for the host
//!
//! Collaborators (catalog, prober, filesystem) are injected via the
//! `bridge-traits` contracts; the engine owns sequencing, throttling, and
//! failure isolation, nothing else.

pub mod catalog;
pub mod classifier;
pub mod error;
pub mod orchestrator;
pub mod resolver;
pub mod run;
pub mod scanner;
pub mod task;

pub use catalog::CatalogBridge;
pub use classifier::{classify, Classification, MIN_PLAUSIBLE_SIZE};
pub use error::{ReconcileError, Result};
pub use orchestrator::{ProbeOrchestrator, SizeOnlyOutcome};
pub use resolver::PathResolver;
pub use run::{
    ItemOutcome, ProgressSink, ReconciliationRun, RunConfig, RunId, RunState, RunSummary,
};
pub use scanner::TreeScanner;
pub use task::{default_triggers, TaskInfo, TaskTrigger, TriggerKind, TASK_INFO};

//! Scheduled-Task Metadata
//!
//! Declarative description of the reconciliation task for the host's
//! scheduler UI: display name, category, and the default trigger. This is
//! configuration, not behavior; the host decides when a run actually
//! starts, and enforces at-most-one run in flight.

use serde::Serialize;

/// Display metadata for the host scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskInfo {
    pub name: &'static str,
    pub key: &'static str,
    pub category: &'static str,
    pub description: &'static str,
}

/// The reconciliation task as shown in the host's scheduled-task list
pub const TASK_INFO: TaskInfo = TaskInfo {
    name: "Extract Pointer Media Info",
    key: "PointerReconcileTask",
    category: "Library",
    description:
        "Extract media technical information (codec, resolution, subtitles) from pointer files",
};

/// Trigger kinds the host scheduler understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    Daily,
}

/// One default trigger for the task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskTrigger {
    pub kind: TriggerKind,
    /// Seconds after midnight, host-local time
    pub time_of_day_secs: u32,
    /// Upper bound on a single run before the host aborts it
    pub max_runtime_secs: u64,
}

/// Default schedule: daily at 03:00, capped at 24 hours.
pub fn default_triggers() -> Vec<TaskTrigger> {
    vec![TaskTrigger {
        kind: TriggerKind::Daily,
        time_of_day_secs: 3 * 60 * 60,
        max_runtime_secs: 24 * 60 * 60,
    }]
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Pointer file {path} could not be read: {reason}")]
    UnreadablePointer { path: String, reason: String },

    #[error("Target {target} for {path} could not be resolved")]
    TargetUnresolvable { path: String, target: String },

    #[error("Probe failed for {target}: {reason}")]
    Probe { target: String, reason: String },

    #[error("Persist failed for {path}: {reason}")]
    Persist { path: String, reason: String },

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Invalid state transition from {from} to {to}: {reason}")]
    InvalidStateTransition {
        from: String,
        to: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, ReconcileError>;

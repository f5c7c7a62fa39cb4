//! Media Catalog Contract
//!
//! Lookup and persistence interface for the external catalog, plus the
//! explicit entry data contract shared with it.
//!
//! The catalog owns the durable state. The engine holds a transient
//! in-memory copy of an entry during a run and writes mutations back
//! through [`MediaCatalog::save_entries`]; it never assumes its copy stays
//! authoritative after persistence, because other agents mutate the
//! catalog concurrently.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{BridgeError, Result};

/// Version of the [`CatalogEntry`] shape agreed with the catalog
/// collaborator. Bump on any field addition or semantic change.
pub const ENTRY_CONTRACT_VERSION: u32 = 1;

/// Kind of a media stream within a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Video,
    Audio,
    Subtitle,
    Other,
}

impl StreamKind {
    /// Get the string representation for interchange with the host
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Video => "video",
            StreamKind::Audio => "audio",
            StreamKind::Subtitle => "subtitle",
            StreamKind::Other => "other",
        }
    }
}

impl FromStr for StreamKind {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "video" => Ok(StreamKind::Video),
            "audio" => Ok(StreamKind::Audio),
            "subtitle" => Ok(StreamKind::Subtitle),
            "other" => Ok(StreamKind::Other),
            _ => Err(BridgeError::OperationFailed(format!(
                "Unknown stream kind: {s}"
            ))),
        }
    }
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One stream within a catalog entry.
///
/// The engine only interprets `kind`; every other attribute is
/// pass-through data owned by the prober and the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaStream {
    pub kind: StreamKind,
    pub codec: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub language: Option<String>,
    pub bitrate: Option<u32>,
}

impl MediaStream {
    /// Stream of the given kind with no technical attributes
    pub fn of_kind(kind: StreamKind) -> Self {
        Self {
            kind,
            codec: None,
            width: None,
            height: None,
            language: None,
            bitrate: None,
        }
    }
}

/// The catalog's record for one pointer file.
///
/// This is contract version [`ENTRY_CONTRACT_VERSION`]. The engine may
/// overwrite `size`, `streams`, and `run_time_ticks`; `id` and `path` are
/// read-only identity fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Catalog-assigned unique identifier
    pub id: String,
    /// Absolute path of the pointer file this entry describes
    pub path: PathBuf,
    /// Byte size of the referenced target, when known
    pub size: Option<u64>,
    /// Ordered stream list, replaced wholesale on a successful probe
    pub streams: Vec<MediaStream>,
    /// Last known run time in ticks (100 ns units), when known
    pub run_time_ticks: Option<i64>,
}

impl CatalogEntry {
    /// Whether any stream of the given kind is present
    pub fn has_stream(&self, kind: StreamKind) -> bool {
        self.streams.iter().any(|s| s.kind == kind)
    }

    /// Display name derived from the pointer path
    pub fn display_name(&self) -> String {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string()
    }
}

/// Catalog lookup and persistence capability
#[async_trait]
pub trait MediaCatalog: Send + Sync {
    /// Find the entry recorded for a pointer-file path.
    ///
    /// Returns `Ok(None)` when the catalog has no entry for the path; the
    /// engine never creates entries, only updates existing ones.
    async fn find_entry_by_path(&self, path: &Path) -> Result<Option<CatalogEntry>>;

    /// Persist updated entries.
    ///
    /// Must be best-effort idempotent: saving the same entry state twice
    /// produces no additional observable change.
    async fn save_entries(&self, entries: &[CatalogEntry]) -> Result<()>;
}

//! Entry Classification
//!
//! Decides, per run, what work a catalog entry needs. The verdict is a
//! pure function of the entry's current stream list and size field and is
//! recomputed every run; nothing here is cached or persisted.
//!
//! Missing stream data deliberately outranks a size discrepancy: probing
//! to fix streams also yields a correct size as a side effect, which makes
//! a separate size-only pass redundant for that entry.

use bridge_traits::catalog::{CatalogEntry, StreamKind};
use serde::{Deserialize, Serialize};

/// Smallest byte count considered a plausible media file. Anything below
/// this is treated as a placeholder value, not a real target size.
pub const MIN_PLAUSIBLE_SIZE: u64 = 1024;

/// Per-run verdict for one catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Missing a video or audio stream; a full probe is required
    NeedsProbe,
    /// Streams are complete but the size is absent or implausible
    NeedsSizeOnly,
    /// Streams complete and size plausible; excluded from all work
    UpToDate,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::NeedsProbe => "needs_probe",
            Classification::NeedsSizeOnly => "needs_size_only",
            Classification::UpToDate => "up_to_date",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify an entry by what work it needs this run.
pub fn classify(entry: &CatalogEntry) -> Classification {
    let has_video = entry.has_stream(StreamKind::Video);
    let has_audio = entry.has_stream(StreamKind::Audio);

    if !has_video || !has_audio {
        return Classification::NeedsProbe;
    }

    match entry.size {
        Some(size) if size >= MIN_PLAUSIBLE_SIZE => Classification::UpToDate,
        _ => Classification::NeedsSizeOnly,
    }
}

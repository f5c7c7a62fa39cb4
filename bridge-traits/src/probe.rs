//! Media Probe Contract
//!
//! Interface to the host's probing subsystem (typically an ffprobe
//! wrapper). The engine never parses media itself; it asks the prober for
//! stream and duration information and merges the result into the catalog
//! entry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::MediaStream;
use crate::error::Result;

/// What a probe invocation should extract.
///
/// The reconciliation engine always requests streams and never chapters;
/// chapter and thumbnail extraction add cost without value here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeRequest {
    pub extract_streams: bool,
    pub extract_chapters: bool,
}

impl Default for ProbeRequest {
    fn default() -> Self {
        Self {
            extract_streams: true,
            extract_chapters: false,
        }
    }
}

/// Outcome of a successful probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Streams found in the target, in container order
    pub streams: Vec<MediaStream>,
    /// Run time in ticks (100 ns units), when the container reports one
    pub run_time_ticks: Option<i64>,
    /// Byte size from the media-source description, when the prober can
    /// report one (useful for non-filesystem targets)
    pub reported_size: Option<u64>,
}

/// Probing capability
///
/// `target` is the resolved path or URL a pointer file references; the
/// implementation is responsible for protocol handling.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    async fn probe(&self, target: &str, request: ProbeRequest) -> Result<ProbeResult>;
}

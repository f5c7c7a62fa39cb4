//! End-to-end reconciliation over a real filesystem via the desktop
//! bridge, with in-memory catalog and probe collaborators.

use async_trait::async_trait;
use bridge_desktop::TokioFileSystem;
use bridge_traits::catalog::{CatalogEntry, MediaCatalog, MediaStream, StreamKind};
use bridge_traits::probe::{MediaProbe, ProbeRequest, ProbeResult};
use core_reconcile::{ReconciliationRun, RunConfig, RunState};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "core_reconcile=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

struct MemoryCatalog {
    entries: Mutex<HashMap<PathBuf, CatalogEntry>>,
}

impl MemoryCatalog {
    fn new(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries: Mutex::new(entries.into_iter().map(|e| (e.path.clone(), e)).collect()),
        }
    }

    fn entry(&self, path: &Path) -> Option<CatalogEntry> {
        self.entries.lock().unwrap().get(path).cloned()
    }
}

#[async_trait]
impl MediaCatalog for MemoryCatalog {
    async fn find_entry_by_path(
        &self,
        path: &Path,
    ) -> bridge_traits::error::Result<Option<CatalogEntry>> {
        Ok(self.entries.lock().unwrap().get(path).cloned())
    }

    async fn save_entries(&self, entries: &[CatalogEntry]) -> bridge_traits::error::Result<()> {
        let mut store = self.entries.lock().unwrap();
        for entry in entries {
            store.insert(entry.path.clone(), entry.clone());
        }
        Ok(())
    }
}

struct FixedProbe;

#[async_trait]
impl MediaProbe for FixedProbe {
    async fn probe(
        &self,
        _target: &str,
        _request: ProbeRequest,
    ) -> bridge_traits::error::Result<ProbeResult> {
        Ok(ProbeResult {
            streams: vec![
                MediaStream::of_kind(StreamKind::Video),
                MediaStream::of_kind(StreamKind::Audio),
            ],
            run_time_ticks: Some(72_000_000_000),
            reported_size: None,
        })
    }
}

/// Lay out a media tree: a pointer file per title, each referencing a
/// real target file next to it.
fn write_pointer(dir: &Path, name: &str, target_bytes: usize) -> (PathBuf, PathBuf) {
    let target = dir.join(format!("{name}.mkv"));
    fs::write(&target, vec![0u8; target_bytes]).unwrap();
    let pointer = dir.join(format!("{name}.strm"));
    fs::write(&pointer, target.display().to_string()).unwrap();
    (pointer, target)
}

fn bare_entry(path: &Path) -> CatalogEntry {
    CatalogEntry {
        id: path.display().to_string(),
        path: path.to_path_buf(),
        size: None,
        streams: vec![],
        run_time_ticks: None,
    }
}

#[tokio::test]
async fn test_reconcile_over_real_directory_tree() {
    init_tracing();

    let root = TempDir::new().unwrap();
    let movies = root.path().join("Movies");
    let nested = movies.join("Classics");
    fs::create_dir_all(&nested).unwrap();

    let (movie_ptr, _) = write_pointer(&movies, "movie", 4096);
    let (classic_ptr, _) = write_pointer(&nested, "classic", 2048);
    // A non-pointer file the scanner must ignore
    fs::write(movies.join("poster.jpg"), b"jpeg").unwrap();

    let fs_bridge = Arc::new(TokioFileSystem::new());
    let catalog = Arc::new(MemoryCatalog::new(vec![
        bare_entry(&movie_ptr),
        bare_entry(&classic_ptr),
    ]));

    let config = RunConfig {
        probe_delay: Duration::from_millis(1),
        size_only_delay: Duration::from_millis(1),
        ..RunConfig::default()
    };
    let mut run = ReconciliationRun::new(
        config,
        fs_bridge.clone(),
        fs_bridge,
        catalog.clone(),
        Arc::new(FixedProbe),
    );

    let summary = run
        .execute(
            &[root.path().to_path_buf()],
            &|_: f64| {},
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(run.state(), RunState::Completed);
    assert_eq!(summary.discovered, 2);
    assert_eq!(summary.needs_probe, 2);
    assert_eq!(summary.succeeded, 2);

    // Sizes come from the real target files, not the probe
    let movie = catalog.entry(&movie_ptr).unwrap();
    assert_eq!(movie.size, Some(4096));
    assert!(movie.has_stream(StreamKind::Video));
    assert_eq!(movie.run_time_ticks, Some(72_000_000_000));

    let classic = catalog.entry(&classic_ptr).unwrap();
    assert_eq!(classic.size, Some(2048));
}

#[tokio::test]
async fn test_deleted_target_fails_item_but_not_run() {
    init_tracing();

    let root = TempDir::new().unwrap();
    let (kept_ptr, _) = write_pointer(root.path(), "kept", 4096);
    let (gone_ptr, gone_target) = write_pointer(root.path(), "gone", 4096);
    fs::remove_file(&gone_target).unwrap();

    let fs_bridge = Arc::new(TokioFileSystem::new());
    let catalog = Arc::new(MemoryCatalog::new(vec![
        bare_entry(&kept_ptr),
        bare_entry(&gone_ptr),
    ]));

    let config = RunConfig {
        probe_delay: Duration::from_millis(1),
        size_only_delay: Duration::from_millis(1),
        ..RunConfig::default()
    };
    let mut run = ReconciliationRun::new(
        config,
        fs_bridge.clone(),
        fs_bridge,
        catalog.clone(),
        Arc::new(FixedProbe),
    );

    let summary = run
        .execute(
            &[root.path().to_path_buf()],
            &|_: f64| {},
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert!(catalog.entry(&kept_ptr).unwrap().has_stream(StreamKind::Video));
    assert!(catalog.entry(&gone_ptr).unwrap().streams.is_empty());
}

//! # Host Bridge Traits
//!
//! Collaborator contracts the reconciliation engine consumes, implemented
//! by the surrounding media-server host.
//!
//! ## Overview
//!
//! The engine never talks to the catalog, the prober, or the filesystem
//! directly. Each of those capabilities is expressed as an async trait in
//! this crate and injected at construction time. The traits are the
//! interface boundary: the engine orchestrates calls with correct
//! sequencing, throttling, and failure isolation, and everything behind a
//! trait is someone else's problem.
//!
//! ## Traits
//!
//! - [`DirectoryLister`](fs::DirectoryLister) - enumerate directory entries
//! - [`FileAccess`](fs::FileAccess) - read pointer files, query target sizes
//! - [`MediaCatalog`](catalog::MediaCatalog) - lookup and persist catalog entries
//! - [`MediaProbe`](probe::MediaProbe) - extract stream/duration info from a target
//!
//! ## Data contract
//!
//! [`CatalogEntry`](catalog::CatalogEntry) is the versioned, explicit shape
//! agreed with the catalog collaborator ([`ENTRY_CONTRACT_VERSION`]).
//! Which fields the engine may overwrite is decided by that contract, not
//! by runtime introspection of whatever the catalog happens to store.
//!
//! ## Thread safety
//!
//! All traits require `Send + Sync` so implementations can be shared as
//! `Arc<dyn Trait>` across async tasks.

pub mod catalog;
pub mod error;
pub mod fs;
pub mod probe;

pub use catalog::{CatalogEntry, MediaCatalog, MediaStream, StreamKind, ENTRY_CONTRACT_VERSION};
pub use error::{BridgeError, Result};
pub use fs::{DirEntry, DirectoryLister, FileAccess};
pub use probe::{MediaProbe, ProbeRequest, ProbeResult};

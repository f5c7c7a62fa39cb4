//! # Desktop Bridge
//!
//! Desktop implementations of the host bridge traits, backed by
//! `tokio::fs`. The catalog and probe collaborators have no desktop
//! implementation here; those belong to the hosting media server.

pub mod filesystem;

pub use filesystem::TokioFileSystem;

//! Firmware update and rollback engine.
//!
//! One update run: open the archive, decode its manifest, gate each entry
//! against the version store, snapshot the destination, copy the payload
//! in, and persist the store once everything succeeded. Rollback mirrors
//! the snapshots back onto the live paths.

pub mod backup;
pub mod engine;
pub mod manifest;
pub mod store;

pub use engine::UpdateEngine;
pub use manifest::{Manifest, ManifestEntry};
pub use store::{InstalledRecord, VersionStore};

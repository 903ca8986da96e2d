//! File-backed JSON storage for structured application state.
//!
//! This crate persists one typed value per file and keeps that file usable
//! across crashes, hand edits, and application upgrades.
//!
//! # Features
//!
//! - **Corruption recovery**: a missing, empty, or undecodable file is
//!   backed up to a timestamped sibling and replaced with freshly
//!   persisted defaults; `load` always returns a value.
//! - **Version-driven invalidation**: a sibling information file records
//!   which application version last trusted the data, so a new release can
//!   decide to discard stale caches.
//! - **Shape-drift detection**: the information file also records the last
//!   accepted default content; top-level field sets are compared to spot
//!   documents whose schema moved underneath the application.
//! - **Nested sampling**: a representative entry can be extracted from a
//!   list or map nested inside a settings document for use as the drift
//!   reference.
//!
//! # File Format
//!
//! Pretty-printed UTF-8 JSON. Field names decode case-insensitively
//! against the stored type's declared schema, absent fields take their
//! default values, and every field is written out, nulls included.
//!
//! # Example
//!
//! ```ignore
//! use satchel_storage::{JsonStorage, StoredValue};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! struct LauncherSettings {
//!     theme: String,
//!     max_results: u32,
//! }
//!
//! impl StoredValue for LauncherSettings {
//!     const FIELDS: &'static [&'static str] = &["theme", "max_results"];
//! }
//!
//! let storage: JsonStorage<LauncherSettings> =
//!     JsonStorage::new("settings.json", env!("CARGO_PKG_VERSION"));
//!
//! let mut settings = storage.load();
//! settings.max_results = 8;
//! storage.set(settings);
//! storage.save();
//! ```
//!
//! # Concurrency
//!
//! Every operation is synchronous. All state-mutating disk writes of one
//! engine instance go through a single exclusive region; two engine
//! instances bound to the same path are not coordinated (documented
//! limitation, matching single-owner usage).
//!
//! # Architecture
//!
//! - `codec` - JSON encode/decode with explicit failure classification
//! - `fs` - injected filesystem capability
//! - `backup` - timestamped copies of files about to be replaced
//! - `version/` - generation tracking and the information-file side channel
//! - `shape` - top-level field-set comparison
//! - `storage/` - the engine and nested-sample extraction
//! - `error` - error types carried between the modules

mod backup;
mod codec;
mod error;
mod fs;
mod shape;
mod storage;
#[cfg(test)]
mod testutil;
mod value;
mod version;

// Re-export main types
pub use codec::{Decoded, decode, decode_value, encode};
pub use error::{Result, StorageError};
pub use fs::{FileSystem, OsFileSystem};
pub use shape::FieldSet;
pub use storage::{JsonStorage, extract_fields};
pub use value::StoredValue;
pub use version::{StorageKind, VersionTracker, info_file_path};

//! Generation tracking against the information file.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{Result, StorageError};
use crate::fs::FileSystem;
use crate::version::{StorageKind, info_file_path};

/// Information-file field holding the application version that last
/// stamped it.
const VERSION_FIELD: &str = "Version";

/// Information-file field holding the serialized baseline content.
pub(crate) const DEFAULT_CONTENT_FIELD: &str = "DefaultContent";

/// Tracks whether the cache generation changed for one storage file.
///
/// Constructed fresh on every load so the flag reflects the information
/// file at that moment. [`close`](Self::close) stamps a new payload, which
/// resets the generation seen by subsequent trackers.
#[derive(Debug)]
pub struct VersionTracker {
    info_path: PathBuf,
    current_version: String,
    clear_cache: bool,
}

impl VersionTracker {
    /// Read the information file and compare its recorded version with the
    /// running application's.
    pub fn new(
        fs: &impl FileSystem,
        path: &Path,
        kind: StorageKind,
        current_version: &str,
    ) -> Self {
        let info_path = info_file_path(path, kind);
        let recorded = recorded_version(fs, &info_path);
        let clear_cache = recorded.as_deref() != Some(current_version);

        Self {
            info_path,
            current_version: current_version.to_string(),
            clear_cache,
        }
    }

    /// Whether the generation changed since the file was last stamped.
    ///
    /// True when the information file is absent, unreadable, or was stamped
    /// by a different application version.
    pub fn clear_cache(&self) -> bool {
        self.clear_cache
    }

    /// Path of the information file this tracker reads and writes.
    pub fn info_path(&self) -> &Path {
        &self.info_path
    }

    /// Persist `content` as the new information-file payload, stamped with
    /// the current application version.
    pub fn close(&self, fs: &impl FileSystem, content: &str) -> Result<()> {
        let mut doc = Map::new();
        doc.insert(
            VERSION_FIELD.to_string(),
            Value::String(self.current_version.clone()),
        );
        doc.insert(
            DEFAULT_CONTENT_FIELD.to_string(),
            Value::String(content.to_string()),
        );

        let text = serde_json::to_string_pretty(&Value::Object(doc))
            .map_err(|e| StorageError::Serialize { source: e })?;
        fs.write(&self.info_path, &text)
            .map_err(|e| StorageError::Io {
                operation: "write",
                path: self.info_path.clone(),
                source: e,
            })
    }
}

fn recorded_version(fs: &impl FileSystem, info_path: &Path) -> Option<String> {
    let text = fs.read_to_string(info_path).ok()?;
    let doc: Map<String, Value> = serde_json::from_str(&text).ok()?;
    match doc.get(VERSION_FIELD)? {
        Value::String(version) => Some(version.clone()),
        _ => None,
    }
}

//! Version tracking and the information-file side channel.
//!
//! The tracker answers one question for the engine: has the running
//! application's expected data shape changed since this file was last
//! trusted? It also owns the information file recording the last accepted
//! default content for drift comparison.

mod tracker;

pub(crate) use tracker::DEFAULT_CONTENT_FIELD;
pub use tracker::VersionTracker;

use std::path::{Path, PathBuf};

/// Class of tracked storage file.
///
/// Keys the information-file name so settings documents and binary cache
/// payloads tracked for the same path never share a side channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// Binary cache payloads.
    Cache,
    /// JSON settings documents.
    Settings,
}

impl StorageKind {
    /// Short tag used in information-file names.
    pub fn tag(self) -> &'static str {
        match self {
            StorageKind::Cache => "cache",
            StorageKind::Settings => "settings",
        }
    }
}

/// Resolve the sibling information-file path for a storage file.
pub fn info_file_path(path: &Path, kind: StorageKind) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}_{}_information.json", kind.tag()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_file_path_is_a_sibling_keyed_by_kind() {
        let path = Path::new("/data/settings.json");

        assert_eq!(
            info_file_path(path, StorageKind::Settings),
            Path::new("/data/settings_settings_information.json")
        );
        assert_eq!(
            info_file_path(path, StorageKind::Cache),
            Path::new("/data/settings_cache_information.json")
        );
    }
}

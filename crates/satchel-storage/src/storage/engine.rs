//! The file-backed storage engine.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};

use crate::backup;
use crate::codec::{self, Decoded};
use crate::error::{Result, StorageError};
use crate::fs::{FileSystem, OsFileSystem};
use crate::shape::FieldSet;
use crate::value::StoredValue;
use crate::version::{DEFAULT_CONTENT_FIELD, StorageKind, VersionTracker};

/// Kind under which the engine registers its files with the version
/// tracker.
const STORAGE_KIND: StorageKind = StorageKind::Settings;

/// Lifecycle of the in-memory value.
///
/// The engine's load, clear, and recovery paths each produce the new state
/// as a whole instead of mutating shared fields from many call sites.
#[derive(Debug)]
enum LoadState<T> {
    /// No load has happened yet.
    Unloaded,
    /// Decoded from a well-formed file.
    Loaded(T),
    /// Defaults regenerated after a missing, empty, or corrupt file.
    Recovered(T),
    /// Defaults reseeded after an explicit clear.
    Cleared(T),
}

impl<T> LoadState<T> {
    fn value(&self) -> Option<&T> {
        match self {
            LoadState::Unloaded => None,
            LoadState::Loaded(v) | LoadState::Recovered(v) | LoadState::Cleared(v) => Some(v),
        }
    }

    fn value_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Unloaded => None,
            LoadState::Loaded(v) | LoadState::Recovered(v) | LoadState::Cleared(v) => Some(v),
        }
    }

    /// Replace the carried value, keeping the current lifecycle stage.
    fn replace(&mut self, value: T) {
        match self {
            LoadState::Unloaded => *self = LoadState::Loaded(value),
            LoadState::Loaded(v) | LoadState::Recovered(v) | LoadState::Cleared(v) => *v = value,
        }
    }
}

struct Inner<T> {
    state: LoadState<T>,
    tracker: Option<VersionTracker>,
}

/// Generic, file-backed JSON storage for one typed value.
///
/// The engine loads a [`StoredValue`] from a pretty-printed JSON file,
/// replaces missing or corrupt content with freshly persisted defaults
/// (leaving a timestamped backup of whatever was there), and detects shape
/// drift between runs through a sibling information file.
///
/// All state-mutating disk writes of one engine instance serialize through
/// a single lock, so concurrent callers cannot interleave partial writes.
/// Two engine instances bound to the same path are not coordinated; that
/// race is a documented limitation of the design.
///
/// No method of the public API returns an error: decode failures fall back
/// to defaults and I/O failures are logged and swallowed.
pub struct JsonStorage<T, F = OsFileSystem> {
    file_path: PathBuf,
    app_version: String,
    fs: F,
    inner: Mutex<Inner<T>>,
}

impl<T: StoredValue> JsonStorage<T> {
    /// Create an engine bound to `file_path` on the real filesystem.
    ///
    /// `app_version` is the external version identifier the tracker uses to
    /// decide whether the cache generation changed.
    pub fn new(file_path: impl Into<PathBuf>, app_version: impl Into<String>) -> Self {
        Self::with_file_system(file_path, app_version, OsFileSystem)
    }
}

impl<T: StoredValue, F: FileSystem> JsonStorage<T, F> {
    /// Create an engine with an injected filesystem capability.
    pub fn with_file_system(
        file_path: impl Into<PathBuf>,
        app_version: impl Into<String>,
        fs: F,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            app_version: app_version.into(),
            fs,
            inner: Mutex::new(Inner {
                state: LoadState::Unloaded,
                tracker: None,
            }),
        }
    }

    /// Path of the backing file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Load the stored value.
    ///
    /// Always produces a value: a missing file, empty or whitespace-only
    /// content, unreadable content, and JSON that fails to decode all
    /// regenerate defaults, backing up an existing file first. After this
    /// returns, the file on disk decodes as `T`. The version tracker is
    /// refreshed before any decode attempt.
    pub fn load(&self) -> T {
        let mut inner = self.lock();
        inner.tracker = Some(self.new_tracker());

        let state = self.read_from_disk();
        let value = state.value().cloned().unwrap_or_default();
        inner.state = state;
        value
    }

    /// Persist the current in-memory value, replacing the file's content.
    ///
    /// Does nothing beyond a warning when nothing has been loaded or set
    /// yet. I/O failures are logged and swallowed; the in-memory value is
    /// unaffected.
    pub fn save(&self) {
        let inner = self.lock();
        match inner.state.value() {
            Some(value) => self.persist(value),
            None => {
                tracing::warn!(
                    "Save requested for {} before any load",
                    self.file_path.display()
                );
            }
        }
    }

    /// Replace the in-memory value without touching the disk.
    pub fn set(&self, value: T) {
        let mut inner = self.lock();
        inner.state = LoadState::Loaded(value);
    }

    /// Mutate the in-memory value in place.
    ///
    /// Starts from the default value when nothing has been loaded yet.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut inner = self.lock();
        if inner.state.value().is_none() {
            inner.state = LoadState::Loaded(T::default());
        }
        if let Some(value) = inner.state.value_mut() {
            f(value);
        }
    }

    /// Delete the backing file and reseed defaults.
    ///
    /// No-op when the file does not exist. The regeneration skips the
    /// backup step since the original content is already gone.
    pub fn clear(&self) {
        let mut inner = self.lock();
        if !self.fs.exists(&self.file_path) {
            return;
        }

        if let Err(e) = self.fs.remove_file(&self.file_path) {
            tracing::error!("Failed to delete {}: {e}", self.file_path.display());
        }

        let value = self.regenerate(false);
        inner.state = LoadState::Cleared(value);
        tracing::info!("Cleared stored data at {}", self.file_path.display());
    }

    /// Record `data` as the new information-file baseline for this path.
    pub fn save_information_file(&self, data: &T) {
        let mut inner = self.lock();
        let tracker = inner.tracker.get_or_insert_with(|| self.new_tracker());
        if let Err(e) = self.stamp(tracker, data) {
            tracing::error!(
                "Failed to save information file for {}: {e}",
                self.file_path.display()
            );
        }
    }

    /// Decide whether cached state needs clearing due to a generation
    /// change.
    ///
    /// When the tracker reports no change and no external hint says
    /// otherwise, `actual_data` is stamped as the new baseline and no
    /// mismatch is reported. Otherwise the baseline is left untouched so
    /// the caller can discard state before re-stamping.
    pub fn check_version_mismatch(&self, actual_data: &T, version_mismatch: bool) -> bool {
        let mut inner = self.lock();
        let tracker = inner.tracker.get_or_insert_with(|| self.new_tracker());

        if !tracker.clear_cache() && !version_mismatch {
            if let Err(e) = self.stamp(tracker, actual_data) {
                tracing::error!(
                    "Failed to stamp information file for {}: {e}",
                    self.file_path.display()
                );
            }
            return false;
        }

        true
    }

    /// Decide whether cached state should be cleared because the stored
    /// shape drifted from `actual_data`.
    ///
    /// Reports `true` on the first observation of a path (stamping
    /// `actual_data` as the baseline), on an absent or empty recorded
    /// baseline, and on any decode failure during the comparison. When both
    /// shapes decode and differ, the new baseline is stamped but the report
    /// is still `false`; pair this with
    /// [`version_mismatch`](Self::version_mismatch) to observe that case.
    pub fn check_with_information_file_to_clear(&self, actual_data: Option<&T>) -> bool {
        let Some(actual) = actual_data else {
            return false;
        };

        let mut guard = self.lock();
        let inner = &mut *guard;
        let tracker = inner.tracker.get_or_insert_with(|| self.new_tracker());

        if !self.fs.exists(tracker.info_path()) {
            // First observation: record the shape, ask the caller to
            // re-derive state.
            if let Err(e) = self.stamp(tracker, actual) {
                tracing::error!(
                    "Failed to stamp information file for {}: {e}",
                    self.file_path.display()
                );
            }
            return true;
        }

        match self.compare_with_baseline(tracker, &mut inner.state, actual) {
            Ok(should_clear) => should_clear,
            Err(e) => {
                tracing::error!(
                    "Drift comparison failed for {}: {e}",
                    self.file_path.display()
                );
                true
            }
        }
    }

    /// The tracker's raw generation-changed flag, independent of content
    /// comparison.
    pub fn version_mismatch(&self) -> bool {
        let mut inner = self.lock();
        inner
            .tracker
            .get_or_insert_with(|| self.new_tracker())
            .clear_cache()
    }

    /// Run the field-set comparison against the recorded baseline.
    fn compare_with_baseline(
        &self,
        tracker: &VersionTracker,
        state: &mut LoadState<T>,
        actual: &T,
    ) -> Result<bool> {
        let info_path = tracker.info_path();
        let text = self
            .fs
            .read_to_string(info_path)
            .map_err(|e| StorageError::Io {
                operation: "read",
                path: info_path.to_path_buf(),
                source: e,
            })?;
        let info: Map<String, Value> =
            serde_json::from_str(&text).map_err(|e| StorageError::MalformedInput {
                path: info_path.to_path_buf(),
                source: e,
            })?;

        let baseline = info
            .get(DEFAULT_CONTENT_FIELD)
            .map(content_text)
            .unwrap_or_default();
        if baseline.is_empty() {
            // No recorded baseline yet: stamp and ask the caller to
            // re-derive state.
            self.stamp(tracker, actual)?;
            return Ok(true);
        }

        let actual_text = codec::encode(actual)?;
        let baseline_fields = FieldSet::from_json_text(&baseline);
        let actual_fields = FieldSet::from_json_text(&actual_text);

        match (baseline_fields, actual_fields) {
            (Some(baseline_set), Some(actual_set)) => {
                if baseline_set.matches(&actual_set) {
                    // Same shape: the recorded baseline stays untouched.
                    Ok(false)
                } else {
                    // Shape drifted: record the new shape. The report stays
                    // `false` on this branch.
                    self.stamp(tracker, actual)?;
                    Ok(false)
                }
            }
            (None, _) => {
                // The recorded baseline no longer decodes as an object.
                self.stamp(tracker, actual)?;
                Ok(true)
            }
            (Some(_), None) => {
                // The live data does not serialize to an object; fall back
                // to the recorded baseline and restore it in memory.
                let restored = match codec::decode::<T>(&baseline) {
                    Decoded::Ok(value) => value,
                    Decoded::MalformedInput(e) | Decoded::TypeMismatch(e) => {
                        return Err(StorageError::ShapeMismatch {
                            path: info_path.to_path_buf(),
                            source: e,
                        });
                    }
                };
                tracker.close(&self.fs, &baseline)?;
                state.replace(restored);
                Ok(false)
            }
        }
    }

    /// Regenerate defaults: back up whatever is on disk, construct the
    /// default value, persist it immediately.
    fn regenerate(&self, backup: bool) -> T {
        if backup && self.fs.exists(&self.file_path) {
            backup::backup_origin_file(&self.fs, &self.file_path);
        }
        let value = T::default();
        self.persist(&value);
        value
    }

    fn read_from_disk(&self) -> LoadState<T> {
        if !self.fs.exists(&self.file_path) {
            return LoadState::Recovered(self.regenerate(false));
        }

        let text = match self.fs.read_to_string(&self.file_path) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Failed to read {}: {e}", self.file_path.display());
                return LoadState::Recovered(self.regenerate(true));
            }
        };

        if text.trim().is_empty() {
            return LoadState::Recovered(self.regenerate(true));
        }

        match codec::decode(&text) {
            Decoded::Ok(value) => LoadState::Loaded(value),
            Decoded::MalformedInput(e) => {
                tracing::error!("{} is not valid JSON: {e}", self.file_path.display());
                LoadState::Recovered(self.regenerate(true))
            }
            Decoded::TypeMismatch(e) => {
                tracing::error!(
                    "{} does not match the expected shape: {e}",
                    self.file_path.display()
                );
                LoadState::Recovered(self.regenerate(true))
            }
        }
    }

    fn persist(&self, value: &T) {
        let text = match codec::encode(value) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(
                    "Failed to serialize data for {}: {e}",
                    self.file_path.display()
                );
                return;
            }
        };

        match self.fs.write(&self.file_path, &text) {
            Ok(()) => tracing::info!("Saved stored data at {}", self.file_path.display()),
            Err(e) => {
                tracing::error!("Failed to save data at {}: {e}", self.file_path.display());
            }
        }
    }

    fn stamp(&self, tracker: &VersionTracker, data: &T) -> Result<()> {
        let content = codec::encode(data)?;
        tracker.close(&self.fs, &content)
    }

    fn new_tracker(&self) -> VersionTracker {
        VersionTracker::new(&self.fs, &self.file_path, STORAGE_KIND, &self.app_version)
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Textual content of a `DefaultContent` entry. A JSON string is taken
/// verbatim, null reads as empty, and any other value is re-serialized.
fn content_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

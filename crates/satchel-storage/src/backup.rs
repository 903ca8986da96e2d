//! Backup of files about to be replaced.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Timelike};

use crate::fs::FileSystem;

/// Copy `path` to a timestamped sibling before it is overwritten.
///
/// Best-effort: the original is never deleted here, an identically named
/// earlier backup is overwritten, and a failed copy is logged without
/// aborting the caller's regeneration.
pub(crate) fn backup_origin_file(fs: &impl FileSystem, path: &Path) {
    let backup_path = backup_path_for(path, Local::now());
    match fs.copy(path, &backup_path) {
        Ok(()) => {
            tracing::info!("Backed up {} to {}", path.display(), backup_path.display());
        }
        Err(e) => {
            tracing::error!("Failed to back up {}: {e}", path.display());
        }
    }
}

/// Compute the backup path `<stem>-<timestamp><suffix>` next to the
/// original. The timestamp carries 100 ns precision so backups taken
/// within the same process run stay sortable and never collide.
fn backup_path_for(path: &Path, now: DateTime<Local>) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    // chrono reports a leap second as nanos >= 1e9; fold it back into range
    let ticks = now.nanosecond() % 1_000_000_000 / 100;
    let name = format!(
        "{stem}-{}-{ticks:07}{suffix}",
        now.format("%Y-%m-%d-%H-%M-%S")
    );
    path.with_file_name(name)
}

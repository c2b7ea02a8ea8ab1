//! Age-based cleanup of rotated log backups
//!
//! The rotation engine caps backups by count; this module covers the
//! age dimension, deleting rotated-out files older than the configured
//! number of days.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use anyhow::Result;

/// Delete rotated backups of `active_file` in `dir` older than `max_age_days`
///
/// Rotated backups carry the active file's name plus a suffix (and `.gz`
/// when compression is on); the active file itself is never touched.
/// Returns the number of files deleted. A missing directory deletes
/// nothing.
pub fn cleanup_rotated_backups(dir: &Path, active_file: &str, max_age_days: u64) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let retention = Duration::from_secs(max_age_days * 24 * 60 * 60);
    let cutoff = SystemTime::now()
        .checked_sub(retention)
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let backup_prefix = format!("{active_file}.");
    let mut deleted_count = 0;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        // Only rotated backups of this sink's file
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if name.starts_with(&backup_prefix) => {}
            _ => continue,
        }

        if let Ok(metadata) = entry.metadata() {
            if let Ok(modified) = metadata.modified() {
                if modified < cutoff && fs::remove_file(&path).is_ok() {
                    deleted_count += 1;
                }
            }
        }
    }

    Ok(deleted_count)
}

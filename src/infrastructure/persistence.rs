//! Draft persistence over a single JSON file.
//!
//! The record is stored pretty-printed with dates as ISO-8601 strings and
//! file attachments as metadata only; binary content never reaches the
//! draft, so attachments must be re-made after a reload.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::domain::ApplicationRecord;

pub struct DraftRepository;

impl DraftRepository {
    /// Serializes the record into the draft slot, overwriting any prior
    /// value.
    pub fn save_draft(record: &ApplicationRecord, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| format!("Serialization failed: {}", e))?;
        fs::write(path, &json).map_err(|e| {
            warn!(path = %path.display(), error = %e, "draft save failed");
            e.to_string()
        })
    }

    /// Reads the draft slot. A missing draft is `Ok(None)`, not an error;
    /// an unreadable or corrupted payload is an `Err` the caller logs and
    /// survives by keeping its in-memory record.
    pub fn load_draft(path: &Path) -> Result<Option<ApplicationRecord>, String> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "draft read failed");
            e.to_string()
        })?;
        let record = serde_json::from_str::<ApplicationRecord>(&content).map_err(|e| {
            warn!(path = %path.display(), error = %e, "draft payload corrupted");
            format!("Invalid draft format - {}", e)
        })?;
        Ok(Some(record))
    }

    /// Removes the draft slot. Clearing an absent draft succeeds.
    pub fn clear_draft(path: &Path) -> Result<(), String> {
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "draft delete failed");
            e.to_string()
        })
    }

    /// O(1) check for a stored draft.
    pub fn draft_available(path: &Path) -> bool {
        path.exists()
    }
}

//! File-backed refresh-state adapter.
//!
//! Persists the last-generated timestamp as a single ISO-8601 line in a
//! file named after the fixed cache key `last-generated-timestamp`,
//! matching the external key-value cache contract the dashboard uses.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use trendscope_brief::{StoreError, TimestampStore};

const TIMESTAMP_KEY: &str = "last-generated-timestamp";

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(TIMESTAMP_KEY),
        }
    }
}

impl TimestampStore for FileStore {
    fn load(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };
        let parsed = DateTime::parse_from_rfc3339(raw.trim())
            .map_err(|e| StoreError::Invalid(format!("'{}': {e}", raw.trim())))?;
        Ok(Some(parsed.with_timezone(&Utc)))
    }

    fn save(&self, at: DateTime<Utc>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, at.to_rfc3339())?;
        Ok(())
    }
}

//! Store implementations with the silent-failure load/save contract.

use crate::error::MemoryError;
use crate::model::MemoryRecord;
use directories::BaseDirs;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

const STATE_FILENAME: &str = "state.json";

/// Store abstraction for the persisted memory record.
///
/// `load` never fails: any read or parse failure yields the default record
/// so a corrupted state file cannot block conversation. `save` is
/// best-effort: write failures are logged and swallowed, and the session
/// continues with in-memory state only.
pub trait MemoryStore: Send + Sync {
    /// Load the record, falling back to the default on any failure.
    fn load(&self) -> MemoryRecord;

    /// Persist the record, overwriting the previous one. Best-effort.
    fn save(&self, record: &MemoryRecord);
}

/// File-backed store holding the record as a single JSON document.
#[derive(Debug, Clone)]
pub struct FileMemoryStore {
    /// Path of the state file.
    path: PathBuf,
}

impl FileMemoryStore {
    /// Create a store persisting to the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!("initialized file memory store (path={})", path.display());
        Self { path }
    }

    /// Default state path under the user's home directory.
    pub fn default_path() -> PathBuf {
        if let Some(home) = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()) {
            return home.join(".banter").join(STATE_FILENAME);
        }
        PathBuf::from(".banter").join(STATE_FILENAME)
    }

    /// Path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut path = self.path.clone().into_os_string();
        path.push(".tmp");
        PathBuf::from(path)
    }

    fn read_record(&self) -> Result<MemoryRecord, MemoryError> {
        let contents = fs::read_to_string(&self.path)?;
        let record: MemoryRecord = serde_json::from_str(&contents)?;
        Ok(record)
    }

    /// Rewrite the state file atomically via a temp file.
    fn write_record(&self, record: &MemoryRecord) -> Result<(), MemoryError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let temp_path = self.temp_path();
        fs::write(&temp_path, serde_json::to_string(record)?)?;
        fs::rename(temp_path, &self.path)?;
        Ok(())
    }
}

impl MemoryStore for FileMemoryStore {
    fn load(&self) -> MemoryRecord {
        if !self.path.exists() {
            debug!("no state file yet (path={})", self.path.display());
            return MemoryRecord::default();
        }
        match self.read_record() {
            Ok(record) => record.sanitized(),
            Err(err) => {
                warn!(
                    "failed to load memory, using default (path={}, error={})",
                    self.path.display(),
                    err
                );
                MemoryRecord::default()
            }
        }
    }

    fn save(&self, record: &MemoryRecord) {
        if let Err(err) = self.write_record(record) {
            warn!(
                "failed to persist memory (path={}, error={})",
                self.path.display(),
                err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FileMemoryStore, MemoryStore};
    use crate::model::MemoryRecord;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn save_then_load_round_trips() {
        let temp = tempdir().expect("tempdir");
        let store = FileMemoryStore::new(temp.path().join("state.json"));

        let mut record = MemoryRecord::default();
        record.set_name("Priya");
        store.save(&record);
        assert_eq!(store.load(), record);

        record.clear_name();
        store.save(&record);
        assert_eq!(store.load(), MemoryRecord::default());
    }

    #[test]
    fn missing_file_loads_the_default_record() {
        let temp = tempdir().expect("tempdir");
        let store = FileMemoryStore::new(temp.path().join("missing.json"));
        assert_eq!(store.load(), MemoryRecord::default());
    }

    #[test]
    fn malformed_contents_load_the_default_record() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("state.json");

        for contents in ["not json", "[1, 2, 3]", "\"just a string\""] {
            std::fs::write(&path, contents).expect("write");
            let store = FileMemoryStore::new(&path);
            assert_eq!(store.load(), MemoryRecord::default());
        }
    }

    #[test]
    fn blank_persisted_name_loads_as_absent() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("state.json");
        std::fs::write(&path, "{\"user_name\": \"  \"}").expect("write");

        let store = FileMemoryStore::new(&path);
        assert_eq!(store.load(), MemoryRecord::default());
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let temp = tempdir().expect("tempdir");
        let store = FileMemoryStore::new(temp.path().join("nested").join("state.json"));

        let mut record = MemoryRecord::default();
        record.set_name("Sam");
        store.save(&record);
        assert_eq!(store.load(), record);
    }

    #[test]
    fn unwritable_path_is_swallowed() {
        let store = FileMemoryStore::new("/proc/banter-cannot-write/state.json");
        let mut record = MemoryRecord::default();
        record.set_name("Sam");
        // Must not panic or surface an error.
        store.save(&record);
    }
}

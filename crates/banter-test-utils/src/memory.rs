use banter_memory::{MemoryRecord, MemoryStore};
use parking_lot::Mutex;

/// In-memory store for tests, with a snapshot accessor to assert on what
/// was persisted.
#[derive(Default)]
pub struct InMemoryStore {
    record: Mutex<MemoryRecord>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: MemoryRecord) -> Self {
        Self {
            record: Mutex::new(record),
        }
    }

    /// The most recently saved record.
    pub fn snapshot(&self) -> MemoryRecord {
        self.record.lock().clone()
    }
}

impl MemoryStore for InMemoryStore {
    fn load(&self) -> MemoryRecord {
        self.record.lock().clone()
    }

    fn save(&self, record: &MemoryRecord) {
        *self.record.lock() = record.clone();
    }
}

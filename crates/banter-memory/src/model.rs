//! Memory record model carried across sessions.

use serde::{Deserialize, Serialize};

/// The persisted memory record. Absence of a known name is `None`, never
/// an empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemoryRecord {
    /// The user's name, once they have revealed it.
    #[serde(default)]
    pub user_name: Option<String>,
}

impl MemoryRecord {
    /// Store a name; blank input is ignored rather than stored.
    pub fn set_name(&mut self, name: &str) {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return;
        }
        self.user_name = Some(trimmed.to_string());
    }

    /// Forget the stored name.
    pub fn clear_name(&mut self) {
        self.user_name = None;
    }

    /// Normalize a loaded record: a blank persisted name collapses to
    /// absence.
    pub fn sanitized(mut self) -> Self {
        if self
            .user_name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            self.user_name = None;
        }
        self
    }
}

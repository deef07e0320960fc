//! Error types for memory persistence.

/// Errors returned by the fallible store internals. The public load/save
/// contract absorbs these; they never reach callers.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

//! Test helpers shared across Banter crates.

pub mod llm;
pub mod memory;

pub use llm::{FailingProvider, FixedProvider, RecordingProvider, StreamingProvider};
pub use memory::InMemoryStore;

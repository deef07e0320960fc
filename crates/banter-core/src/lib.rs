//! Decision core for Banter.
//!
//! This crate owns the ordered intent router, the name extractor, the
//! history shaper, and the per-turn chat engine that wires them to the
//! memory store and completion provider.

pub mod engine;
pub mod extract;
pub mod history;
pub mod router;

/// Conversation types, re-exported for convenience.
pub use banter_llm::{Role, Turn};
/// Per-turn engine and reply types.
pub use engine::{ChatEngine, DEFAULT_SYSTEM_PROMPT, Reply, ReplySource, failure_reply};
/// Name extraction.
pub use extract::extract_name;
/// History bounding.
pub use history::{DEFAULT_MAX_PAIRS, shape};
/// Ordered local intent rules.
pub use router::{GREETINGS, JOKES, route};

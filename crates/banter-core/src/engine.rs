//! Per-turn orchestration: local rules first, remote completion second.

use crate::history::{DEFAULT_MAX_PAIRS, shape};
use crate::router::route;
use banter_llm::{CompletionProvider, LlmError, Turn};
use banter_memory::{MemoryRecord, MemoryStore};
use log::{debug, info};
use std::sync::Arc;

/// Default standing instruction for the remote model.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful, concise terminal chatbot.";

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    /// A local rule produced the reply.
    Local,
    /// The completion provider produced the reply (or its failure text).
    Remote,
}

/// One completed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Reply text shown to the user.
    pub text: String,
    /// Origin of the reply.
    pub source: ReplySource,
}

/// Convert a provider failure into the inline reply surfaced to the user.
/// Remote failures never propagate past the engine.
pub fn failure_reply(err: &LlmError) -> String {
    format!("[llm-error] {err}")
}

/// Drives one conversation: owns the loaded memory record, the growing
/// history, and the store/provider collaborators.
pub struct ChatEngine {
    store: Arc<dyn MemoryStore>,
    provider: Arc<dyn CompletionProvider>,
    memory: MemoryRecord,
    history: Vec<Turn>,
    max_pairs: usize,
}

impl ChatEngine {
    /// Create an engine, loading the persisted memory record.
    pub fn new(store: Arc<dyn MemoryStore>, provider: Arc<dyn CompletionProvider>) -> Self {
        let memory = store.load();
        info!(
            "chat engine ready (provider={}, known_name={})",
            provider.name(),
            memory.user_name.is_some()
        );
        Self {
            store,
            provider,
            memory,
            history: vec![Turn::system(DEFAULT_SYSTEM_PROMPT)],
            max_pairs: DEFAULT_MAX_PAIRS,
        }
    }

    /// Replace the standing instruction.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.history[0] = Turn::system(prompt);
        self
    }

    /// Override the history window size.
    pub fn with_max_pairs(mut self, max_pairs: usize) -> Self {
        self.max_pairs = max_pairs;
        self
    }

    /// The current memory record.
    pub fn memory(&self) -> &MemoryRecord {
        &self.memory
    }

    /// The full (unshaped) history.
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// The configured completion provider.
    pub fn provider(&self) -> Arc<dyn CompletionProvider> {
        self.provider.clone()
    }

    /// Try the local rules. On a hit the memory is persisted and the
    /// exchange recorded in history.
    pub fn local_reply(&mut self, text: &str) -> Option<String> {
        let reply = route(text, &mut self.memory)?;
        self.store.save(&self.memory);
        self.push_user(text);
        self.push_assistant(&reply);
        debug!("local rule matched (input_len={})", text.len());
        Some(reply)
    }

    /// Run one full turn: local rules first, remote completion second.
    /// Always returns a reply; provider failures become inline text.
    pub async fn turn(&mut self, text: &str) -> Reply {
        if let Some(reply) = self.local_reply(text) {
            return Reply {
                text: reply,
                source: ReplySource::Local,
            };
        }
        Reply {
            text: self.remote_reply(text).await,
            source: ReplySource::Remote,
        }
    }

    /// Send a prompt straight to the provider, bypassing the rules.
    pub async fn force_remote(&mut self, prompt: &str) -> String {
        self.remote_reply(prompt).await
    }

    async fn remote_reply(&mut self, text: &str) -> String {
        self.push_user(text);
        let shaped = self.shaped_history();
        let provider = self.provider.clone();
        debug!(
            "escalating to provider (provider={}, turns={})",
            provider.name(),
            shaped.len()
        );
        let reply = match provider.complete(&shaped).await {
            Ok(reply) => reply,
            Err(err) => failure_reply(&err),
        };
        self.push_assistant(&reply);
        reply
    }

    /// Append a user turn. Streaming callers drive the provider themselves
    /// and commit the concatenated reply with `push_assistant`.
    pub fn push_user(&mut self, content: &str) {
        self.history.push(Turn::user(content));
    }

    /// Append an assistant turn.
    pub fn push_assistant(&mut self, content: &str) {
        self.history.push(Turn::assistant(content));
    }

    /// The bounded history to send to the provider.
    pub fn shaped_history(&self) -> Vec<Turn> {
        shape(&self.history, self.max_pairs)
    }
}

use async_trait::async_trait;
use banter_llm::{CompletionProvider, LlmError, ReplyStream, Turn};
use futures_util::stream;
use parking_lot::Mutex;
use std::sync::Arc;

/// Provider that always returns the same reply.
#[derive(Debug, Clone)]
pub struct FixedProvider {
    reply: String,
}

impl FixedProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl CompletionProvider for FixedProvider {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn complete(&self, _history: &[Turn]) -> Result<String, LlmError> {
        Ok(self.reply.clone())
    }
}

/// Provider that captures the history it is sent.
#[derive(Debug, Clone)]
pub struct RecordingProvider {
    reply: String,
    pub last_history: Arc<Mutex<Vec<Turn>>>,
}

impl RecordingProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            last_history: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl CompletionProvider for RecordingProvider {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn complete(&self, history: &[Turn]) -> Result<String, LlmError> {
        *self.last_history.lock() = history.to_vec();
        Ok(self.reply.clone())
    }
}

/// Provider that streams a fixed fragment sequence.
#[derive(Debug, Clone)]
pub struct StreamingProvider {
    chunks: Vec<String>,
    reply: String,
}

impl StreamingProvider {
    pub fn new(chunks: Vec<String>) -> Self {
        let reply = chunks.join("");
        Self { chunks, reply }
    }
}

#[async_trait]
impl CompletionProvider for StreamingProvider {
    fn name(&self) -> &'static str {
        "streaming"
    }

    async fn complete(&self, _history: &[Turn]) -> Result<String, LlmError> {
        Ok(self.reply.clone())
    }

    async fn complete_stream(&self, _history: &[Turn]) -> Result<ReplyStream, LlmError> {
        let chunks = self
            .chunks
            .iter()
            .cloned()
            .map(Ok)
            .collect::<Vec<_>>();
        Ok(Box::pin(stream::iter(chunks)))
    }
}

/// Provider that always fails.
#[derive(Debug, Clone)]
pub struct FailingProvider {
    message: String,
}

impl FailingProvider {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl CompletionProvider for FailingProvider {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn complete(&self, _history: &[Turn]) -> Result<String, LlmError> {
        Err(LlmError::Api {
            status: 500,
            message: self.message.clone(),
        })
    }
}

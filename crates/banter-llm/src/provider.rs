//! Completion provider interface consumed by the chat engine.

use crate::chat::Turn;
use crate::error::LlmError;
use async_trait::async_trait;
use futures_util::stream::{self, Stream};
use std::pin::Pin;

/// Finite, in-order stream of reply fragments; concatenated they form the
/// full reply.
pub type ReplyStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send>>;

#[async_trait]
/// Remote completion capability invoked when no local rule matches.
pub trait CompletionProvider: Send + Sync {
    /// Provider name used in logs.
    fn name(&self) -> &'static str;

    /// Send the history and return the full assistant reply.
    async fn complete(&self, history: &[Turn]) -> Result<String, LlmError>;

    /// Stream the reply as text fragments. The default delivers the full
    /// reply as a single fragment.
    async fn complete_stream(&self, history: &[Turn]) -> Result<ReplyStream, LlmError> {
        let reply = self.complete(history).await?;
        Ok(Box::pin(stream::iter([Ok(reply)])))
    }
}

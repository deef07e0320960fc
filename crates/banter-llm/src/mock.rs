//! Deterministic offline completion provider.

use crate::chat::{Role, Turn};
use crate::error::LlmError;
use crate::provider::CompletionProvider;
use async_trait::async_trait;
use log::debug;

/// Echo-style provider for environments without provider credentials.
///
/// Replies are derived from the last user turn only, which keeps routing
/// and history-shaping behavior testable without network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockProvider;

impl MockProvider {
    /// Create the mock provider.
    pub fn new() -> Self {
        Self
    }

    fn reply_for(history: &[Turn]) -> String {
        let last_user = history
            .iter()
            .rev()
            .find(|turn| turn.role == Role::User)
            .map(|turn| turn.content.as_str());
        format!("[mock] You said: {}", last_user.unwrap_or("(no user message)"))
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(&self, history: &[Turn]) -> Result<String, LlmError> {
        debug!("mock completion (turns={})", history.len());
        Ok(Self::reply_for(history))
    }
}

#[cfg(test)]
mod tests {
    use super::MockProvider;
    use crate::chat::Turn;
    use crate::provider::CompletionProvider;
    use futures_util::StreamExt;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn echoes_the_last_user_turn() {
        let history = vec![
            Turn::system("rules"),
            Turn::user("first"),
            Turn::assistant("reply"),
            Turn::user("second"),
        ];
        let reply = MockProvider::new().complete(&history).await.expect("reply");
        assert_eq!(reply, "[mock] You said: second");
    }

    #[tokio::test]
    async fn reports_missing_user_turns() {
        let reply = MockProvider::new()
            .complete(&[Turn::system("rules")])
            .await
            .expect("reply");
        assert_eq!(reply, "[mock] You said: (no user message)");
    }

    #[tokio::test]
    async fn default_stream_yields_the_full_reply() {
        let mut stream = MockProvider::new()
            .complete_stream(&[Turn::user("hi")])
            .await
            .expect("stream");
        let first = stream.next().await.expect("fragment").expect("text");
        assert_eq!(first, "[mock] You said: hi");
        assert!(stream.next().await.is_none());
    }
}

//! OpenAI-compatible chat completion client.

use crate::chat::Turn;
use crate::error::LlmError;
use crate::provider::{CompletionProvider, ReplyStream};
use async_trait::async_trait;
use futures_util::StreamExt;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const STREAM_BUFFER: usize = 32;

/// Client for OpenAI-compatible `/chat/completions` endpoints.
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    temperature: f32,
}

impl OpenAiClient {
    /// Create a new client. The key may be absent; calls then fail with
    /// `LlmError::MissingApiKey` instead of failing construction.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Set the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for API-compatible services).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn api_key(&self) -> Result<&str, LlmError> {
        self.api_key.as_deref().ok_or(LlmError::MissingApiKey)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request_body<'a>(&'a self, history: &'a [Turn], stream: bool) -> WireRequest<'a> {
        WireRequest {
            model: &self.model,
            messages: history
                .iter()
                .map(|turn| WireMessage {
                    role: turn.role.as_str(),
                    content: &turn.content,
                })
                .collect(),
            temperature: self.temperature,
            stream,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "is_false")]
    stream: bool,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
}

#[derive(Deserialize)]
struct WireResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct StreamResponse {
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Deserialize, Default)]
struct StreamDelta {
    content: Option<String>,
}

async fn status_error(response: reqwest::Response) -> LlmError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|err| format!("unreadable body: {err}"));
    LlmError::Api { status, message }
}

/// Read the SSE body and forward text deltas until the body or the
/// receiver goes away.
async fn forward_sse(response: reqwest::Response, tx: mpsc::Sender<Result<String, LlmError>>) {
    let mut body = response.bytes_stream();
    let mut buffer = String::new();
    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(bytes) => bytes,
            Err(err) => {
                let _ = tx.send(Err(LlmError::Http(err))).await;
                return;
            }
        };
        buffer.push_str(&String::from_utf8_lossy(&chunk));
        while let Some(pos) = buffer.find("\n\n") {
            let event = buffer[..pos].to_string();
            buffer.drain(..=pos + 1);
            if forward_event(&event, &tx).await.is_err() {
                return;
            }
        }
    }
    // Trailing event without the final blank line (interrupted streams).
    let rest = std::mem::take(&mut buffer);
    let _ = forward_event(rest.trim(), &tx).await;
}

/// Forward the text deltas of one SSE event. Err means the receiver hung up.
async fn forward_event(
    event: &str,
    tx: &mpsc::Sender<Result<String, LlmError>>,
) -> Result<(), ()> {
    for line in event.lines() {
        let Some(data) = line.strip_prefix("data: ") else {
            continue;
        };
        if data.trim() == "[DONE]" {
            continue;
        }
        let Ok(parsed) = serde_json::from_str::<StreamResponse>(data) else {
            continue;
        };
        for choice in parsed.choices {
            if let Some(content) = choice.delta.content
                && !content.is_empty()
                && tx.send(Ok(content)).await.is_err()
            {
                return Err(());
            }
        }
    }
    Ok(())
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    /// Send the shaped history and return `choices[0].message.content`.
    async fn complete(&self, history: &[Turn]) -> Result<String, LlmError> {
        let key = self.api_key()?;
        let body = self.request_body(history, false);
        debug!(
            "sending completion request (model={}, turns={})",
            self.model,
            history.len()
        );
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        let data: WireResponse = response.json().await?;
        data.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)
    }

    /// Request a streamed completion and forward its text deltas.
    async fn complete_stream(&self, history: &[Turn]) -> Result<ReplyStream, LlmError> {
        let key = self.api_key()?;
        let body = self.request_body(history, true);
        debug!(
            "sending streaming completion request (model={}, turns={})",
            self.model,
            history.len()
        );
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        tokio::spawn(forward_sse(response, tx));
        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}

#[cfg(test)]
mod tests {
    use super::{OpenAiClient, forward_event};
    use crate::chat::Turn;
    use crate::error::LlmError;
    use crate::provider::CompletionProvider;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    #[test]
    fn request_body_maps_roles_and_omits_stream_flag() {
        let client = OpenAiClient::new(Some("key".to_string())).with_model("test-model");
        let history = vec![Turn::system("rules"), Turn::user("hi")];

        let body = serde_json::to_value(client.request_body(&history, false)).expect("serialize");
        assert_eq!(body["model"], serde_json::json!("test-model"));
        assert_eq!(
            body["messages"],
            serde_json::json!([
                { "role": "system", "content": "rules" },
                { "role": "user", "content": "hi" },
            ])
        );
        assert!(body["temperature"].is_number());
        assert_eq!(body.get("stream"), None);

        let streaming =
            serde_json::to_value(client.request_body(&history, true)).expect("serialize");
        assert_eq!(streaming["stream"], serde_json::json!(true));
    }

    #[tokio::test]
    async fn complete_requires_an_api_key() {
        let client = OpenAiClient::new(None);
        let err = client.complete(&[Turn::user("hi")]).await.expect_err("err");
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[tokio::test]
    async fn forward_event_extracts_text_deltas() {
        let (tx, mut rx) = mpsc::channel(8);
        let event = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n",
            "data: [DONE]"
        );
        forward_event(event, &tx).await.expect("receiver alive");
        drop(tx);

        let mut collected = String::new();
        while let Some(item) = rx.recv().await {
            collected.push_str(&item.expect("text delta"));
        }
        assert_eq!(collected, "Hello");
    }

    #[tokio::test]
    async fn forward_event_skips_unparseable_payloads() {
        let (tx, mut rx) = mpsc::channel(8);
        let event = "data: not json\ndata: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}";
        forward_event(event, &tx).await.expect("receiver alive");
        drop(tx);

        let item = rx.recv().await.expect("one delta").expect("text");
        assert_eq!(item, "ok");
        assert!(rx.recv().await.is_none());
    }
}

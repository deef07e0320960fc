//! Error types for completion providers.

/// Errors returned by completion providers.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// No API key was configured for the live provider.
    #[error("no API key configured; set OPENAI_API_KEY or run in mock mode")]
    MissingApiKey,
    /// HTTP transport error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// The provider rejected the request.
    #[error("provider error (status {status}): {message}")]
    Api { status: u16, message: String },
    /// The response did not contain a usable reply.
    #[error("provider returned no reply")]
    EmptyResponse,
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

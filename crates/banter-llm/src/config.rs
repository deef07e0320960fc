//! Env-driven provider configuration for the entry-point binaries.

use crate::mock::MockProvider;
use crate::openai::OpenAiClient;
use crate::provider::CompletionProvider;
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Environment variable selecting mock or live completion.
pub const ENV_MODE: &str = "BANTER_LLM_MODE";
/// Environment variable holding the provider API key.
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable overriding the model name.
pub const ENV_MODEL: &str = "BANTER_LLM_MODEL";
/// Environment variable overriding the API base URL.
pub const ENV_BASE_URL: &str = "BANTER_LLM_BASE_URL";

/// Completion mode for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmMode {
    /// Call the configured OpenAI-compatible endpoint.
    #[default]
    Live,
    /// Use the deterministic offline provider.
    Mock,
}

/// Provider configuration resolved from the environment, with optional
/// overrides applied by the binaries' CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LlmConfig {
    /// Mock or live completion.
    pub mode: LlmMode,
    /// API key for the live provider.
    pub api_key: Option<String>,
    /// Model name override.
    pub model: Option<String>,
    /// Base URL override for API-compatible services.
    pub base_url: Option<String>,
}

impl LlmConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self {
            mode: mode_from(std::env::var(ENV_MODE).ok().as_deref()),
            api_key: std::env::var(ENV_API_KEY)
                .ok()
                .filter(|key| !key.trim().is_empty()),
            model: std::env::var(ENV_MODEL).ok(),
            base_url: std::env::var(ENV_BASE_URL).ok(),
        }
    }

    /// Build the provider described by this configuration. Never fails: a
    /// live provider without a key reports the problem at completion time.
    pub fn build_provider(&self) -> Arc<dyn CompletionProvider> {
        match self.mode {
            LlmMode::Mock => {
                info!("using mock completion provider");
                Arc::new(MockProvider::new())
            }
            LlmMode::Live => {
                let mut client = OpenAiClient::new(self.api_key.clone());
                if let Some(model) = &self.model {
                    client = client.with_model(model.clone());
                }
                if let Some(base_url) = &self.base_url {
                    client = client.with_base_url(base_url.clone());
                }
                info!(
                    "using live completion provider (key_present={})",
                    self.api_key.is_some()
                );
                Arc::new(client)
            }
        }
    }
}

fn mode_from(value: Option<&str>) -> LlmMode {
    match value {
        Some(value) if value.eq_ignore_ascii_case("mock") => LlmMode::Mock,
        _ => LlmMode::Live,
    }
}

//! HTTP front end for Banter.
//!
//! Exposes the same local-rules-first, LLM-fallback flow as the REPL:
//! memory is loaded per request, saved after a local match, and the
//! caller-supplied history is shaped before the remote call.

use anyhow::Result;
use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};
use axum::Json;
use banter_core::{failure_reply, route, shape};
use banter_llm::{CompletionProvider, LlmConfig, LlmMode, Turn};
use banter_memory::{FileMemoryStore, MemoryStore};
use clap::Parser;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line options for the server.
#[derive(Parser)]
#[command(
    name = "banter-server",
    version,
    about = "HTTP API for the Banter chatbot"
)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,
    /// Path to the memory state file
    #[arg(long)]
    state: Option<PathBuf>,
    /// Use the deterministic mock provider (no network, no API key)
    #[arg(long)]
    mock: bool,
    /// Model name for the live provider
    #[arg(long)]
    model: Option<String>,
    /// Base URL for an OpenAI-compatible API
    #[arg(long)]
    base_url: Option<String>,
    /// User/assistant pairs kept in the window sent to the model
    #[arg(long, default_value_t = banter_core::DEFAULT_MAX_PAIRS)]
    max_pairs: usize,
}

/// Shared collaborators for the handlers.
#[derive(Clone)]
struct AppState {
    store: Arc<dyn MemoryStore>,
    provider: Arc<dyn CompletionProvider>,
    max_pairs: usize,
}

/// Chat request: prior history plus the latest user message.
#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    messages: Vec<Turn>,
    text: String,
}

/// Chat response; `used_llm` is false when a local rule answered.
#[derive(Debug, Serialize)]
struct ChatResponse {
    reply: String,
    used_llm: bool,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to the Banter API. Use POST /chat to talk to the bot."
    }))
}

/// Local rules first, remote completion second.
async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Json<ChatResponse> {
    let mut memory = state.store.load();

    if let Some(reply) = route(&req.text, &mut memory) {
        state.store.save(&memory);
        debug!("handled locally (input_len={})", req.text.len());
        return Json(ChatResponse {
            reply,
            used_llm: false,
        });
    }

    let mut history = req.messages;
    history.push(Turn::user(req.text.as_str()));
    let shaped = shape(&history, state.max_pairs);
    debug!(
        "escalating to provider (provider={}, turns={})",
        state.provider.name(),
        shaped.len()
    );
    let reply = match state.provider.complete(&shaped).await {
        Ok(reply) => reply,
        Err(err) => failure_reply(&err),
    };
    Json(ChatResponse {
        reply,
        used_llm: true,
    })
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/chat", post(chat))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = LlmConfig::from_env();
    if cli.mock {
        config.mode = LlmMode::Mock;
    }
    if cli.model.is_some() {
        config.model = cli.model.clone();
    }
    if cli.base_url.is_some() {
        config.base_url = cli.base_url.clone();
    }

    let state_path = cli
        .state
        .clone()
        .unwrap_or_else(FileMemoryStore::default_path);
    let state = AppState {
        store: Arc::new(FileMemoryStore::new(state_path)),
        provider: config.build_provider(),
        max_pairs: cli.max_pairs,
    };

    info!("listening on {}", cli.addr);
    let listener = tokio::net::TcpListener::bind(cli.addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}

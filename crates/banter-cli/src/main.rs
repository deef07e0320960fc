//! Terminal REPL for Banter: local rules first, LLM fallback second.

use anyhow::Result;
use banter_core::{ChatEngine, failure_reply};
use banter_llm::{CompletionProvider as _, LlmConfig, LlmMode};
use banter_memory::{FileMemoryStore, MemoryStore};
use clap::Parser;
use futures_util::StreamExt;
use log::debug;
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const EXIT_WORDS: [&str; 4] = ["bye", "/bye", "quit", "exit"];

/// Command-line options for the REPL.
#[derive(Parser)]
#[command(
    name = "banter",
    version,
    about = "Rule-first terminal chatbot with an LLM fallback"
)]
struct Cli {
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

/// Apply CLI flag overrides on top of the env-derived config.
fn apply_overrides(mut config: LlmConfig, cli: &Cli) -> LlmConfig {
    if cli.mock {
        config.mode = LlmMode::Mock;
    }
    if cli.model.is_some() {
        config.model = cli.model.clone();
    }
    if cli.base_url.is_some() {
        config.base_url = cli.base_url.clone();
    }
    config
}

fn prompt() -> Result<()> {
    print!("You: ");
    std::io::stdout().flush()?;
    Ok(())
}

/// Stream a remote reply to stdout, committing the concatenated text to
/// the engine history.
async fn stream_reply(engine: &mut ChatEngine, prompt: &str) {
    engine.push_user(prompt);
    let shaped = engine.shaped_history();
    let provider = engine.provider();
    let reply = match provider.complete_stream(&shaped).await {
        Ok(mut fragments) => {
            print!("Bot: ");
            let _ = std::io::stdout().flush();
            let mut full = String::new();
            while let Some(fragment) = fragments.next().await {
                match fragment {
                    Ok(piece) => {
                        print!("{piece}");
                        let _ = std::io::stdout().flush();
                        full.push_str(&piece);
                    }
                    Err(err) => {
                        full = failure_reply(&err);
                        print!("{full}");
                        break;
                    }
                }
            }
            println!();
            if full.is_empty() {
                "(no content)".to_string()
            } else {
                full
            }
        }
        Err(err) => {
            let full = failure_reply(&err);
            println!("Bot: {full}");
            full
        }
    };
    engine.push_assistant(&reply);
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = apply_overrides(LlmConfig::from_env(), &cli);
    let provider = config.build_provider();
    let state_path = cli
        .state
        .clone()
        .unwrap_or_else(FileMemoryStore::default_path);
    debug!("using state path {}", state_path.display());
    let store: Arc<dyn MemoryStore> = Arc::new(FileMemoryStore::new(state_path));
    let mut engine = ChatEngine::new(store, provider).with_max_pairs(cli.max_pairs);

    println!("🤖 Welcome to Banter!");
    if config.mode == LlmMode::Live && config.api_key.is_none() {
        println!(
            "ℹ️  No OPENAI_API_KEY found; local replies will work, AI answers will show a warning."
        );
    }
    println!("Type 'bye' to exit. Type '/ai <prompt>' to ask directly. Type 'help' for options.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            println!();
            println!("Bot: Goodbye! 👋");
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if EXIT_WORDS.contains(&input.to_lowercase().as_str()) {
            println!("Bot: Goodbye! 👋");
            break;
        }
        if let Some(rest) = input.strip_prefix("/ai") {
            let forced = rest.trim();
            if forced.is_empty() {
                println!("Bot: Usage: /ai <your question>");
                continue;
            }
            stream_reply(&mut engine, forced).await;
            continue;
        }
        if let Some(reply) = engine.local_reply(input) {
            println!("Bot: {reply}");
            continue;
        }
        println!("Bot: 🤔 Let me think…");
        stream_reply(&mut engine, input).await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cli, apply_overrides};
    use banter_llm::{LlmConfig, LlmMode};
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[test]
    fn mock_flag_overrides_the_mode() {
        let cli = Cli::parse_from(["banter", "--mock"]);
        let config = apply_overrides(LlmConfig::default(), &cli);
        assert_eq!(config.mode, LlmMode::Mock);
    }

    #[test]
    fn model_and_base_url_flags_override_env_values() {
        let cli = Cli::parse_from([
            "banter",
            "--model",
            "test-model",
            "--base-url",
            "http://localhost:1234/v1",
        ]);
        let base = LlmConfig {
            model: Some("env-model".to_string()),
            ..LlmConfig::default()
        };
        let config = apply_overrides(base, &cli);
        assert_eq!(config.model, Some("test-model".to_string()));
        assert_eq!(config.base_url, Some("http://localhost:1234/v1".to_string()));
    }

    #[test]
    fn absent_flags_keep_env_values() {
        let cli = Cli::parse_from(["banter"]);
        let base = LlmConfig {
            mode: LlmMode::Mock,
            model: Some("env-model".to_string()),
            ..LlmConfig::default()
        };
        let config = apply_overrides(base.clone(), &cli);
        assert_eq!(config.mode, base.mode);
        assert_eq!(config.model, base.model);
    }
}

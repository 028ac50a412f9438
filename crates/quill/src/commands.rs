//! Command implementations and the console event sink

use anyhow::{Context, Result};
use std::path::PathBuf;

use quill_agent::{AgentLoop, EventSink};
use quill_config::{ensure_dir, history_path, Config};
use quill_history::HistoryStore;
use quill_provider::OpenAiProvider;

/// Prints tool activity according to the verbosity flags
struct ConsoleSink {
    verbose: bool,
    silent: bool,
}

impl EventSink for ConsoleSink {
    fn on_tool_call(&self, name: &str, args: &serde_json::Value) {
        if self.silent {
            return;
        }
        if self.verbose {
            println!(" - calling tool: {}({})", name, args);
        } else {
            println!(" - calling tool: {}", name);
        }
    }

    fn on_tool_result(&self, _name: &str, result: &str) {
        if self.verbose && !self.silent {
            println!("-> {}", result);
        }
    }
}

/// Discard the stored conversation history
pub async fn clear_command() -> Result<()> {
    let store = HistoryStore::new(history_path());
    if store.clear().await? {
        println!("Conversation history cleared.");
    } else {
        println!("No conversation history to clear.");
    }
    Ok(())
}

/// Run one prompt through the agent loop
pub async fn run_command(
    prompt: String,
    verbose: bool,
    silent: bool,
    root: Option<PathBuf>,
    model: Option<String>,
) -> Result<String> {
    let mut config = Config::load().await.context("failed to load config")?;

    if let Some(root) = root {
        config.agent.sandbox_root = root.display().to_string();
    }
    if let Some(model) = model {
        config.provider.model = model;
    }
    if let Ok(key) = std::env::var("QUILL_API_KEY") {
        config.provider.api_key = key;
    }
    if let Ok(base) = std::env::var("QUILL_API_BASE") {
        config.provider.api_base = base;
    }

    // The sandbox root has to exist before paths can resolve into it.
    let sandbox = config.sandbox_root();
    ensure_dir(&sandbox)
        .await
        .with_context(|| format!("failed to create sandbox root {:?}", sandbox))?;

    let provider = OpenAiProvider::new(
        config.provider.api_key.clone(),
        config.provider.api_base.clone(),
        config.provider.model.clone(),
    );

    let store = HistoryStore::new(history_path());
    let agent = AgentLoop::new(provider, &config, store)
        .with_sink(Box::new(ConsoleSink { verbose, silent }));

    let answer = agent.run(&prompt).await?;
    Ok(answer)
}

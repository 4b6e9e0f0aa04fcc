use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod config;

use config::AppConfig;
use fieldnote_core::{builtin_tool_registry, AgentCatalog, ModelChain, Orchestrator};
use fieldnote_provider::{GeminiProvider, ProviderRegistry, StubProvider};
use fieldnote_server::state::AppState;
use fieldnote_store::JournalStore;

#[derive(Parser)]
#[command(name = "fieldnote", version, about = "portfolio & journal chat service")]
struct Cli {
    #[arg(long, default_value = "fieldnote.yaml", help = "Path to the config file")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP API server")]
    Serve {
        #[arg(long, help = "Override the configured bind address")]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Serve { bind } => serve(config, bind).await,
    }
}

async fn serve(config: AppConfig, bind_override: Option<String>) -> Result<()> {
    let store = JournalStore::open(&config.database.path)?;

    let mut registry = ProviderRegistry::new();
    match std::env::var(&config.models.api_key_env) {
        Ok(key) if !key.is_empty() => {
            registry.register("gemini", Arc::new(GeminiProvider::new(key)));
        }
        _ => {
            tracing::warn!(
                "{} not set, registering the offline stub provider",
                config.models.api_key_env
            );
            registry.register("gemini", Arc::new(StubProvider));
        }
    }

    let chain = ModelChain::new(registry, config.models.chain.clone());
    let tools = builtin_tool_registry(store.clone())?;
    let orchestrator = Arc::new(Orchestrator::new(chain, AgentCatalog::builtin(), tools));

    let state = AppState {
        orchestrator,
        store,
    };
    let bind = bind_override.unwrap_or(config.server.bind);
    fieldnote_server::serve(state, &bind).await
}

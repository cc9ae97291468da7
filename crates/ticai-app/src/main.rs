mod chat;
mod cli;
mod command;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use ticai_ai::{AiGateway, CompletionError, OpenAiClient, OpenAiConfig};
use ticai_common::EventBus;
use ticai_config::TicaiConfig;
use ticai_session::{
    FileStore, KvStore, MemoryStore, ModeRegistry, SessionController, SessionSettings,
    SystemClock,
};
use tokio::io::BufReader;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

/// Stand-in used when no API key is configured. Every request fails, so
/// the session answers with its fallback reply.
struct OfflineGateway {
    reason: String,
}

#[async_trait]
impl AiGateway for OfflineGateway {
    async fn complete(&self, _prompt: &str, _mode: &str) -> Result<String, CompletionError> {
        Err(CompletionError::ApiError(self.reason.clone()))
    }
}

fn build_gateway(config: &TicaiConfig, registry: &ModeRegistry) -> Arc<dyn AiGateway> {
    let client = OpenAiConfig::from_env().and_then(|openai| {
        OpenAiClient::new(
            openai
                .with_base_url(config.ai.base_url.clone())
                .with_model(config.ai.model.clone())
                .with_max_tokens(config.ai.max_tokens)
                .with_temperature(config.ai.temperature)
                .with_mode_instructions(registry.instructions()),
        )
    });

    match client {
        Ok(client) => {
            tracing::info!(model = %config.ai.model, "completion client ready");
            Arc::new(client)
        }
        Err(e) => {
            tracing::warn!("completion client unavailable, replies will fall back: {e}");
            Arc::new(OfflineGateway {
                reason: e.to_string(),
            })
        }
    }
}

/// Store file location: CLI override, then config, then the platform data dir.
fn store_path(cli_path: Option<&Path>, configured: &str) -> ticai_common::Result<PathBuf> {
    if let Some(path) = cli_path {
        return Ok(path.to_path_buf());
    }
    if !configured.is_empty() {
        return Ok(PathBuf::from(configured));
    }
    Ok(ticai_config::default_store_path()?)
}

fn build_store(args: &cli::Args, config: &TicaiConfig) -> Arc<dyn KvStore> {
    if args.ephemeral {
        tracing::info!("Using in-memory store");
        return Arc::new(MemoryStore::new());
    }

    match store_path(args.store.as_deref(), &config.storage.path) {
        Ok(path) => {
            tracing::info!(path = %path.display(), "Using store file");
            Arc::new(FileStore::new(path))
        }
        Err(e) => {
            tracing::warn!("No store location, conversation will not persist: {e}");
            Arc::new(MemoryStore::new())
        }
    }
}

#[tokio::main]
async fn main() {
    let args = cli::parse();

    let loaded = ticai_config::load_config(args.config.as_deref());
    let configured_level = loaded
        .as_ref()
        .map(|c| c.logging.level.directive())
        .unwrap_or("ticai=info");

    let log_directive = args.log_level.as_deref().unwrap_or(configured_level);
    let directive = log_directive
        .parse::<Directive>()
        .or_else(|_| "ticai=info".parse::<Directive>());
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = directive {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("TicAI v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        TicaiConfig::default()
    });

    if args.print_config {
        println!("{}", ticai_config::config_to_json(&config));
        return;
    }

    let registry = ModeRegistry::builtin();
    let gateway = build_gateway(&config, &registry);
    let store = build_store(&args, &config);

    let controller = SessionController::start(
        SessionSettings::from_config(&config),
        registry,
        gateway,
        store,
        Arc::new(SystemClock),
        EventBus::new(256),
    )
    .await;

    let input = BufReader::new(tokio::io::stdin());
    if let Err(e) = chat::run(controller, input).await {
        tracing::error!("Chat loop error: {e}");
    }
    tracing::info!("Shutdown complete");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_path_prefers_cli_then_config() {
        let path = store_path(Some(Path::new("/tmp/cli.json")), "/tmp/config.json").unwrap();
        assert_eq!(path, PathBuf::from("/tmp/cli.json"));

        let path = store_path(None, "/tmp/config.json").unwrap();
        assert_eq!(path, PathBuf::from("/tmp/config.json"));
    }

    #[test]
    fn store_path_falls_back_to_data_dir() {
        if let Ok(path) = store_path(None, "") {
            assert!(path.ends_with("ticai/store.json"));
        }
    }
}

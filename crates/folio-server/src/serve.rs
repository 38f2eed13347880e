use crate::completion::{CompletionProvider, CompletionSettings, OpenAiClient};
use crate::config::FolioConfig;
use crate::http::{self, AppState};
use folio_core::ContentLoader;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Build the completion client, or `None` when no credential is configured.
pub fn completion_provider(
    config: &FolioConfig,
) -> anyhow::Result<Option<Arc<dyn CompletionProvider>>> {
    let Some(api_key) = config.resolved_api_key() else {
        return Ok(None);
    };

    let settings = CompletionSettings {
        model: config.provider.model.clone(),
        temperature: config.provider.temperature,
        max_tokens: config.provider.max_tokens,
    };
    let client = OpenAiClient::new(
        &config.provider.base_url,
        api_key,
        settings,
        config.provider.timeout(),
    )?;
    let provider: Arc<dyn CompletionProvider> = Arc::new(client);
    Ok(Some(provider))
}

pub async fn run(config: FolioConfig, content_root: &Path, http_addr: SocketAddr) -> anyhow::Result<()> {
    info!("Starting Folio server v{}", env!("CARGO_PKG_VERSION"));

    let errors = config.validate();
    if !errors.is_empty() {
        anyhow::bail!("Invalid configuration:\n  - {}", errors.join("\n  - "));
    }

    let sources = config.content_sources(content_root);
    info!("Blog posts: {:?}", sources.blog_dir);
    info!("Records: {:?}", sources.records_file);
    info!("Personal info: {:?}", sources.personal_file);

    let completion = completion_provider(&config)?;
    if completion.is_none() {
        warn!(
            "No provider credential found (set {} or [provider] api_key); chat requests will fail with 500",
            config.provider.api_key_env
        );
    }

    let state = AppState::new(ContentLoader::new(sources), completion);
    let app = http::create_router(state).layer(http::cors_layer(&config.server.cors_origins));

    let listener = tokio::net::TcpListener::bind(http_addr).await?;
    info!("HTTP: {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, terminating...");
}

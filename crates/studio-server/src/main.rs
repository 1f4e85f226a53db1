use std::sync::Arc;

use anyhow::Context;
use studio_llm::providers::{OpenAIConfig, OpenAIProvider};
use studio_server::{AppState, ServerConfig, build_app_router};
use studio_service::{ServiceConfig, StudioService};
use studio_store::StoreConfig;
use studio_utils::{EnvSource, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // --- Configuration ---
    let env = EnvSource::from_env();
    let config = ServerConfig::from_source(&env).context("invalid server configuration")?;
    tracing::info!(host = %config.host, port = config.port, "Loaded server configuration");

    // --- Persistence ---
    let store = StoreConfig::from_source(&env)
        .and_then(StoreConfig::build)
        .context("failed to set up persistence")?;

    // --- Service ---
    let service_config = ServiceConfig::from_source(&env).context("invalid service configuration")?;
    let mut service = StudioService::new(store, service_config);

    // --- Completion ---
    let mut api_key = None;
    if env.get("OPENAI_API_KEY").is_some() {
        let openai = OpenAIConfig::from_source(&env).context("invalid completion configuration")?;
        api_key = Some(openai.api_key.clone());
        let provider = OpenAIProvider::with_config(openai).context("failed to build completion client")?;
        service = service.with_completion(Arc::new(provider));
        tracing::info!(model = %service.config().model, "Completion provider configured");
    } else {
        tracing::warn!("OPENAI_API_KEY not set; generation and model analysis are disabled");
    }

    let mut state = AppState::new(service, config.clone());
    if let Some(key) = api_key.as_deref() {
        state = state.with_api_key(key);
    }
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    tracing::info!(%addr, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for Ctrl-C or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

pub mod api;
pub mod cli;
pub mod clients;
pub mod config;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;

use std::sync::Arc;
use tokio::signal;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use clients::google::GoogleSearchClient;
pub use config::Config;
use db::Store;
use services::StudySearchService;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::load()?;
    config.validate()?;

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        Some(handle)
    } else {
        None
    };

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    if prometheus_handle.is_some() {
        info!("Prometheus metrics recorder initialized");
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(config, prometheus_handle).await,

        Commands::Search { kind, id, query } => {
            let service = build_search_service(&config).await?;
            cli::cmd_search(&service, kind.into(), id, &query.join(" ")).await
        }

        Commands::Recent { kind, id, limit } => {
            let service = build_search_service(&config).await?;
            cli::cmd_recent(&service, kind.into(), id, limit).await
        }

        Commands::Init => cli::cmd_init(),
    }
}

/// Search service for one-shot CLI commands, backed by the configured database.
async fn build_search_service(config: &Config) -> anyhow::Result<StudySearchService> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await
    .context("Failed to open database")?;

    let provider = Arc::new(GoogleSearchClient::new(&config.search)?);

    Ok(StudySearchService::new(
        provider,
        Arc::new(store.search_results()),
        &config.search,
    ))
}

async fn run_server(
    config: Config,
    prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> anyhow::Result<()> {
    if !config.server.enabled {
        anyhow::bail!("HTTP server is disabled (server.enabled = false)");
    }

    if config.search.api_key.is_empty() || config.search.search_engine_id.is_empty() {
        tracing::warn!(
            "Search credentials are not configured; cache misses will fail until \
             search.api_key and search.search_engine_id are set"
        );
    }

    let port = config.server.port;
    let api_state = api::create_app_state(config, prometheus_handle).await?;

    info!(
        "Search cache ready (freshness: {}h, limit: {})",
        api_state.config.search.freshness_hours, api_state.config.search.result_limit
    );

    let app = api::router(api_state);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Web server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}

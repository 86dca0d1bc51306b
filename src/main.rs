//! Cinematch HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use cinematch::config::Config;
use cinematch::embedding::{LazyEmbedder, MiniLmEmbedder};
use cinematch::gateway::{AppState, create_router_with_state};
use cinematch::{CatalogLoader, JsonCatalogLoader, Recommender};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        catalog = %config.catalog_path.display(),
        "Cinematch starting"
    );

    let minilm_config = config.minilm_config();
    if minilm_config.testing_stub {
        tracing::warn!("CINEMATCH_EMBEDDER_STUB set, recommendations will not be semantic");
    }
    minilm_config.validate()?;

    let dimension = minilm_config.embedding_dim;
    let embedder = LazyEmbedder::new(dimension, move || {
        MiniLmEmbedder::load(minilm_config.clone())
    });

    let loader = JsonCatalogLoader::new(config.catalog_path.clone());
    tracing::info!(source = %loader.describe(), "Catalog source configured");

    let recommender = Arc::new(
        Recommender::new(embedder, loader).with_default_top_n(config.default_top_n),
    );

    // Build catalog vectors in the background; /ready reports pending until done.
    let warm = Arc::clone(&recommender);
    tokio::task::spawn_blocking(move || match warm.warm_up() {
        Ok(stats) => tracing::info!(
            items = stats.total_items,
            categories = stats.distinct_categories,
            "Catalog vectors ready"
        ),
        Err(e) => tracing::warn!(
            error = %e,
            kind = e.kind(),
            "Warm-up failed, catalog will be built on first request"
        ),
    });

    let state = AppState::new(recommender).with_max_top_n(config.max_top_n);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Cinematch shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

use std::sync::Arc;

use anyhow::{Context, Result};
use tododoc::{
    build_router,
    config::{AppConfig, StoreBackend},
    models::Item,
    repository::DocumentRepository,
    state::AppState,
    store::{DocumentStore, HttpDocumentStore, MemoryDocumentStore},
    telemetry::Telemetry,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env().context("failed to load application configuration")?;

    let store: Arc<dyn DocumentStore> = match config.store_backend {
        StoreBackend::Memory => {
            info!("store backend: memory");
            Arc::new(MemoryDocumentStore::new())
        }
        StoreBackend::Http => {
            info!(endpoint = %config.store_endpoint, "store backend: http");
            Arc::new(
                HttpDocumentStore::new(&config.store_endpoint, &config.store_auth_key)
                    .context("failed to build document store client")?,
            )
        }
    };

    let telemetry = Telemetry::tracing();
    let repository = DocumentRepository::<Item>::initialize(
        store,
        &config.database,
        &config.collection,
        telemetry.clone(),
    )
    .await
    .context("failed to provision database and collection")?;

    let state = AppState::new(Arc::new(repository), telemetry, config.api_url.clone());
    let app = build_router(state);

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(address = %addr, "tododoc started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tododoc=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

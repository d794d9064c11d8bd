use std::net::SocketAddr;
use std::sync::Arc;

use posting_backend::{
    config::{init_config, LogFormat, StorageBackend},
    database::pool::create_pool,
    middleware::cors::cors_layer,
    routes,
    store::{MemoryPostingStore, PgPostingStore, PostingStore},
    AppState,
};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = init_config()?;
    init_tracing(config.log_format);

    let store: Arc<dyn PostingStore> = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = create_pool(config).await?;
            let store = PgPostingStore::new(pool);
            store.migrate().await?;
            info!("Using Postgres posting store");
            Arc::new(store)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory posting store; postings are lost on restart");
            Arc::new(MemoryPostingStore::new())
        }
    };

    let app_state = AppState::new(store, config.store_timeout);
    let app = routes::router(app_state, cors_layer(&config.cors_allowed_origins));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

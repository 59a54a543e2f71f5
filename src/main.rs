use doc_store::api::{create_router, AppState};
use doc_store::infrastructure::{init_tracing, AppConfig, FsDocumentRepository};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(
        config.log_format,
        "api=debug,doc_store=debug,tower_http=debug",
    );

    let repository = FsDocumentRepository::open(&config.storage.root).await?;
    info!(root = %config.storage.root.display(), "document storage ready");

    let addr = config.server.socket_addr();
    let state = AppState::new(Arc::new(repository), config);
    let app = create_router(state);

    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

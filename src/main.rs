//! Context Graph Server - Binary Entry Point
//!
//! Serves the agent socket, the UI socket and the REST API.

use context_graph::api::{create_router, AppState};
use context_graph::config::ServerConfig;
use context_graph::error::ServerResult;
use context_graph::logging::init_logging;
use tracing::info;

#[tokio::main]
async fn main() -> ServerResult<()> {
    let config = ServerConfig::from_env()?;
    init_logging(&config);

    let addr = config.bind_addr();
    let state = AppState::start(config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        service = context_graph::NAME,
        version = context_graph::VERSION,
        addr = %addr,
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

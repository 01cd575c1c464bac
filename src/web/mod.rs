//! The `serve` form surface.

pub mod handlers;
pub mod router;
pub mod state;

use crate::config::toml_config::DashboardConfig;
use anyhow::Context;
pub use router::build_router;
pub use state::{AppState, SharedState};

pub async fn serve(config: DashboardConfig, monitor: bool) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_router(AppState::new(config, monitor));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot listen on {}", addr))?;
    tracing::info!("🚀 Dashboard listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

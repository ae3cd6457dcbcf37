pub mod handlers;
pub mod types;

use crate::{Result, config::Config};
use axum::{Router, routing::post};
use handlers::AppState;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/askjeng", post(handlers::ask))
        .route("/warmup", post(handlers::warmup))
        .route("/imagine", post(handlers::imagine))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let app = router(AppState::from_config(&config));

    // Start server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

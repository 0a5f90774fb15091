mod handlers;
mod state;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

use crate::config::Settings;
use crate::location::GoogleGeocoder;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/geocode", get(handlers::geocode))
        .route("/health", get(handlers::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

pub async fn start(settings: &Settings) -> std::io::Result<()> {
    let provider = Arc::new(GoogleGeocoder::new(settings));
    let app = build_router(AppState::new(provider));
    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("catch locator listening on http://{}", addr);

    axum::serve(listener, app).await
}

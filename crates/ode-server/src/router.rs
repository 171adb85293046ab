//! Axum router construction.

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::routes;

/// Build the application router: drive endpoints, the catalog API and a
/// health check, wrapped in HTTP tracing.
pub fn build_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/toc_bin", get(routes::toc::toc))
        .route("/toc_bin/", get(routes::toc::toc))
        .route("/toc_bin/{*selector}", get(routes::toc::toc_with_selector))
        .route("/data/{*path}", get(routes::data::data))
        .route("/api/games", get(routes::games::list_games))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

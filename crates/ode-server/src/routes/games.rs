//! `GET /api/games`: catalog listing for the menu client.

use axum::extract::State;
use axum::Json;

use crate::catalog::CatalogEntry;
use crate::context::AppContext;

pub async fn list_games(State(ctx): State<AppContext>) -> Json<Vec<CatalogEntry>> {
    Json(ctx.catalog.entries().to_vec())
}

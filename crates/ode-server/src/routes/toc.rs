//! `GET /toc_bin[/{selector}]`: binary table of contents.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::context::AppContext;
use crate::error::AppError;
use crate::responder::{parse_selector, produce_toc};

/// GET /toc_bin -- TOC of the currently selected image.
pub async fn toc(State(ctx): State<AppContext>) -> Result<Response, AppError> {
    respond(ctx, None).await
}

/// GET /toc_bin/{*selector} -- select a catalog entry, then return its TOC.
pub async fn toc_with_selector(
    State(ctx): State<AppContext>,
    Path(selector): Path<String>,
) -> Result<Response, AppError> {
    respond(ctx, parse_selector(&selector)).await
}

async fn respond(ctx: AppContext, selector: Option<i64>) -> Result<Response, AppError> {
    tracing::debug!(?selector, "TOC requested");

    // Parsing touches the filesystem.
    let blob = tokio::task::spawn_blocking(move || {
        let mut session = ctx.session.lock();
        produce_toc(&mut session, &ctx.catalog, selector)
    })
    .await
    .map_err(|e| ode_core::Error::Internal(format!("TOC task failed: {e}")))??;

    Ok((
        StatusCode::OK,
        [
            (header::CACHE_CONTROL, "no-cache".to_string()),
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_LENGTH, blob.len().to_string()),
        ],
        blob,
    )
        .into_response())
}

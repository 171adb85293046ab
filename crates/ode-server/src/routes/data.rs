//! `GET /data/{*path}`: chunked sector stream.
//!
//! The path is ignored; the stream always reads the session's current
//! medium starting at the sector holding the first byte of the `Range`.
//! The connection is closed once the body ends.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Response;

use crate::context::AppContext;
use crate::error::AppError;
use crate::stream::SectorStream;

pub async fn data(State(ctx): State<AppContext>, headers: HeaderMap) -> Result<Response, AppError> {
    let range = headers.get(header::RANGE).and_then(|v| v.to_str().ok());
    let stream = SectorStream::begin(&ctx.session, range)?;

    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::TRANSFER_ENCODING, "chunked")
        .header(header::CONNECTION, "close")
        .body(Body::from_stream(stream.into_body_stream()))
        .map_err(|e| AppError::new(ode_core::Error::Internal(e.to_string())))
}

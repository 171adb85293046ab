//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`ode_core::Error`] so that route handlers
//! can return `Result<T, AppError>` and use `?` on core results. The drive
//! firmware only reads the status line, so bodies are short plaintext.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError {
    inner: ode_core::Error,
}

impl AppError {
    pub fn new(inner: ode_core::Error) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &ode_core::Error {
        &self.inner
    }
}

impl From<ode_core::Error> for AppError {
    fn from(e: ode_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in handler"
            );
        } else {
            tracing::debug!(status = %status, error = %self.inner, "Request rejected");
        }

        let body = match &self.inner {
            ode_core::Error::TocParse { .. } => "Error\n".to_string(),
            other => format!("{other}\n"),
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}

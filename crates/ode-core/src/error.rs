//! Unified error type for odestream.
//!
//! Every request-level failure funnels into [`Error`], which carries enough
//! context for handlers to derive an HTTP status code via
//! [`Error::http_status`]. Sector-level end-of-data is not an error and never
//! reaches this type.

use std::fmt;
use std::path::Path;

/// Unified error type covering all request-level failure modes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A catalog selection or other entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "game").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// No medium is loaded, or its TOC has no tracks.
    #[error("Toc not valid or no file found")]
    MediumNotReady,

    /// The `Range` header was missing or could not be parsed.
    #[error("Invalid range header: {0}")]
    RangeHeaderInvalid(String),

    /// The selected image's table of contents could not be parsed.
    #[error("Failed to parse TOC of {path}: {message}")]
    TocParse {
        /// Image that was being parsed.
        path: String,
        /// Human-readable parser error.
        message: String,
    },

    /// A data stream is already active on this session.
    #[error("A sector stream is already active")]
    StreamBusy,

    /// Configuration or input data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::MediumNotReady => 404,
            Error::RangeHeaderInvalid(_) => 404,
            Error::TocParse { .. } => 500,
            Error::StreamBusy => 409,
            Error::Validation(_) => 400,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::TocParse`].
    pub fn toc_parse(path: &Path, message: impl fmt::Display) -> Self {
        Error::TocParse {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

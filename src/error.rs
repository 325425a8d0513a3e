//! Error types for the catalog client and the resolution pipeline

use thiserror::Error;

/// Failure talking to the catalog site
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Catalog returned HTTP {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Catalog answered but refused the request
    #[error("Rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Payload(#[from] PayloadError),
}

/// Failure decoding a stream payload
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Payload is not valid base64")]
    Base64,

    #[error("Payload is not valid UTF-8")]
    Utf8,

    #[error("Payload has no quality entries")]
    Empty,
}

/// Failure kinds surfaced by the resolution pipeline
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Upstream(#[from] CatalogError),

    #[error("Stream unavailable: {0}")]
    StreamUnavailable(String),
}

//! Error types for the DMM affiliate API client.
//!
//! # Design
//! `Error` is the kind every failure belongs to, so callers can catch all of
//! them with one match arm. `Authentication` gets a dedicated variant because
//! callers typically handle bad credentials differently from everything
//! else. All other reportable conditions land in `Api` with an `ApiError`
//! describing which stage of the pipeline rejected the call.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Any failure reported by the client.
#[derive(Debug, Error)]
pub enum Error {
    /// The Provider rejected the configured credentials.
    #[error("authentication failed: {message}")]
    Authentication { status: Option<u16>, message: String },

    /// Any other reportable condition.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    pub fn is_authentication(&self) -> bool {
        matches!(self, Error::Authentication { .. })
    }

    /// The `ApiError` behind this failure, if it is not an authentication
    /// failure.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(inner) => Some(inner),
            Error::Authentication { .. } => None,
        }
    }
}

/// Reportable conditions other than authentication failures.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A call argument failed validation. Raised before any request is sent.
    #[error("invalid parameter `{field}`: {message}")]
    InvalidParameter { field: &'static str, message: String },

    /// The connection could not be established or the round trip failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The Provider answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The Provider answered 2xx but reported an error inside the result.
    #[error("provider error {status}: {message}")]
    Provider { status: u16, message: String },

    /// The body is not JSON at all.
    #[error("invalid JSON response: {0}")]
    InvalidJson(String),

    /// The body is JSON but a required top-level key is missing.
    #[error("response is missing required field `{0}`")]
    MissingField(&'static str),

    /// Decoding a structurally present result failed.
    #[error("Failed to get {resource}: {source}")]
    Decode {
        resource: &'static str,
        #[source]
        source: DecodeError,
    },

    /// The client has been closed and cannot issue further requests.
    #[error("client is closed")]
    ClientClosed,
}

/// Failures raised while decoding a present result section.
///
/// Only shape violations at the section level produce these; individual
/// fields degrade to their defaults instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("`{field}` is not an object")]
    NotAnObject { field: &'static str },

    #[error("`{field}` is not an array")]
    NotAnArray { field: &'static str },
}

/// Errors raised while building a `ClientConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("`{0}` must not be empty")]
    Empty(&'static str),

    #[error("environment variable `{0}` is not set")]
    MissingEnv(&'static str),
}

//! Client error taxonomy.
//!
//! Every failure surfaces to the immediate caller with enough structure to
//! decide whether to retry, alert, or reject: authentication failures are
//! terminal for the calling operation, validation failures happen before any
//! network call, and API failures carry the method, path, status, and body.

use http::Method;
use thiserror::Error;

use crate::ports::{CacheError, TransportError};

/// Errors from SecurePay client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing credentials, a non-2xx auth response, or a token-less auth
    /// body. Never retried internally.
    #[error("SecurePay authentication failed: {0}")]
    Authentication(String),

    /// Non-2xx response from a domain endpoint after the 401-retry policy
    /// has been applied.
    #[error("SecurePay API error: HTTP {status} on {method} {path} - {body}")]
    Api {
        method: Method,
        path: String,
        status: u16,
        body: String,
    },

    /// A required create-payment field was empty or absent. Raised before
    /// any network call.
    #[error("missing required field: {field}")]
    Validation { field: &'static str },

    /// The request executor was invoked with a method outside
    /// GET/POST/PUT/DELETE. A programming-time misuse, not a network
    /// condition.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(Method),

    /// The token cache store failed.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Network-level failure reaching the gateway.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

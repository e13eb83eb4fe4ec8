//! Gateway transport port.
//!
//! Narrow seam over the HTTP client so the authenticator and request executor
//! can be exercised against scripted responses in tests. The production
//! implementation is [`crate::adapters::transport::ReqwestTransport`].

use async_trait::async_trait;
use http::{Method, StatusCode};
use secrecy::SecretString;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

/// Authorization carried by a gateway request.
#[derive(Clone)]
pub enum RequestAuth {
    /// HTTP basic auth with the client credentials (the `/v1/auth` exchange).
    Basic {
        client_id: String,
        client_secret: SecretString,
    },

    /// Bearer token auth (all domain endpoints).
    Bearer(String),
}

impl std::fmt::Debug for RequestAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestAuth::Basic { client_id, .. } => f
                .debug_struct("Basic")
                .field("client_id", client_id)
                .field("client_secret", &"[REDACTED]")
                .finish(),
            RequestAuth::Bearer(_) => f.debug_struct("Bearer").finish_non_exhaustive(),
        }
    }
}

/// A single outbound request to the gateway.
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub method: Method,
    pub url: String,
    pub auth: RequestAuth,

    /// JSON body for POST/PUT/DELETE, query parameters for GET.
    pub body: Option<Value>,

    /// Fixed per-call timeout (15 s auth, 30 s domain requests).
    pub timeout: Duration,
}

/// A gateway response, status and raw body.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub body: String,
}

impl GatewayResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Parse the body as JSON. An empty or whitespace body parses to an
    /// empty object, matching the gateway's occasional bodyless 2xx.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        if self.body.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        serde_json::from_str(&self.body)
    }
}

/// Errors raised at the transport layer (connectivity, timeouts).
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Port for issuing HTTP requests to the gateway.
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    /// Execute a request, returning the response whatever its status.
    ///
    /// Non-2xx statuses are not transport errors; classification happens in
    /// the request executor.
    async fn execute(&self, request: GatewayRequest) -> Result<GatewayResponse, TransportError>;
}

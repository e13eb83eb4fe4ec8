//! reqwest-backed gateway transport.

use async_trait::async_trait;
use http::Method;
use secrecy::ExposeSecret;
use serde_json::Value;

use crate::ports::{GatewayRequest, GatewayResponse, GatewayTransport, RequestAuth, TransportError};

/// Production `GatewayTransport` over a shared `reqwest::Client`.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a fresh connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport over an existing client (shared pool).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GatewayTransport for ReqwestTransport {
    async fn execute(&self, request: GatewayRequest) -> Result<GatewayResponse, TransportError> {
        let timeout = request.timeout;

        // reqwest 0.11 still speaks http 0.2; convert at the seam
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .expect("method name round-trips");

        let mut builder = self
            .client
            .request(method, &request.url)
            .timeout(timeout)
            .header("Accept", "application/json");

        builder = match &request.auth {
            RequestAuth::Basic {
                client_id,
                client_secret,
            } => builder.basic_auth(client_id, Some(client_secret.expose_secret())),
            RequestAuth::Bearer(token) => builder.bearer_auth(token),
        };

        if let Some(body) = &request.body {
            builder = if request.method == Method::GET {
                builder.query(&query_pairs(body))
            } else {
                builder.json(body)
            };
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(timeout)
            } else {
                TransportError::Network(e.to_string())
            }
        })?;

        let status = http::StatusCode::from_u16(response.status().as_u16())
            .expect("status code round-trips");
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(GatewayResponse { status, body })
    }
}

/// Flatten a JSON object into query pairs; scalars render without quotes.
fn query_pairs(body: &Value) -> Vec<(String, String)> {
    match body {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| {
                let rendered = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), rendered)
            })
            .collect(),
        _ => Vec::new(),
    }
}

//! Mock gateway transport for testing.
//!
//! Serves scripted responses in order and records every request for
//! assertions. Supports error injection for network-failure paths.

use async_trait::async_trait;
use http::StatusCode;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::ports::{GatewayRequest, GatewayResponse, GatewayTransport, RequestAuth, TransportError};

/// One scripted reply: a response or an injected transport error.
#[derive(Debug, Clone)]
pub struct ScriptedResponse {
    outcome: Result<GatewayResponse, TransportError>,
}

impl ScriptedResponse {
    /// A response with the given status and body.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            outcome: Ok(GatewayResponse {
                status,
                body: body.into(),
            }),
        }
    }

    /// An injected transport error.
    pub fn error(error: TransportError) -> Self {
        Self {
            outcome: Err(error),
        }
    }
}

/// Recorded request for assertions.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: http::Method,
    pub url: String,
    pub auth: RequestAuth,
    pub body: Option<Value>,
}

impl RecordedCall {
    /// The bearer token this call carried, if any.
    pub fn bearer_token(&self) -> Option<&str> {
        match &self.auth {
            RequestAuth::Bearer(token) => Some(token),
            RequestAuth::Basic { .. } => None,
        }
    }

    /// The basic-auth client id this call carried, if any.
    pub fn basic_client_id(&self) -> Option<&str> {
        match &self.auth {
            RequestAuth::Basic { client_id, .. } => Some(client_id),
            RequestAuth::Bearer(_) => None,
        }
    }
}

#[derive(Default)]
struct MockState {
    script: VecDeque<ScriptedResponse>,
    calls: Vec<RecordedCall>,
}

/// Mock `GatewayTransport` for testing.
///
/// # Example
///
/// ```ignore
/// let transport = MockTransport::new();
/// transport.push(ScriptedResponse::new(StatusCode::OK, r#"{"auth_token":"t"}"#));
///
/// // ... exercise the client ...
///
/// assert_eq!(transport.calls().len(), 1);
/// ```
#[derive(Default)]
pub struct MockTransport {
    state: Mutex<MockState>,
}

impl MockTransport {
    /// Create a transport with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next reply.
    pub fn push(&self, response: ScriptedResponse) {
        self.state
            .lock()
            .expect("mock mutex poisoned")
            .script
            .push_back(response);
    }

    /// All requests seen so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state
            .lock()
            .expect("mock mutex poisoned")
            .calls
            .clone()
    }
}

#[async_trait]
impl GatewayTransport for MockTransport {
    async fn execute(&self, request: GatewayRequest) -> Result<GatewayResponse, TransportError> {
        let mut state = self.state.lock().expect("mock mutex poisoned");

        state.calls.push(RecordedCall {
            method: request.method,
            url: request.url,
            auth: request.auth,
            body: request.body,
        });

        state
            .script
            .pop_front()
            .map(|scripted| scripted.outcome)
            .unwrap_or_else(|| {
                Err(TransportError::Network(
                    "mock transport script exhausted".to_string(),
                ))
            })
    }
}

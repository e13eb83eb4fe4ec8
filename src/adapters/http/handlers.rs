//! HTTP handlers for the callback and redirect endpoints.
//!
//! The callback endpoint receives SecurePay's server-to-server status POST;
//! an invalid signature is rejected with 403 before any classification
//! happens. The redirect endpoint receives the customer's browser after
//! checkout and only chooses a destination; the reference behavior performs
//! no signature check there.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRequest, Json, Query, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde_json::{json, Map, Value};

use crate::client::SecurePayClient;
use crate::domain::CallbackOutcome;
use crate::ports::PaymentEvents;

/// Shared state for the callback endpoints.
#[derive(Clone)]
pub struct CallbackAppState {
    /// The configured client; supplies verification and parsing.
    pub client: Arc<SecurePayClient>,

    /// Host notification sink for classified outcomes.
    pub events: Arc<dyn PaymentEvents>,

    /// Browser destination after a successful payment.
    pub success_url: String,

    /// Browser destination after a failed payment.
    pub failure_url: String,
}

/// Callback request body, decoded per its content type.
///
/// The gateway has been observed to POST both JSON and form-encoded bodies;
/// form fields decode as strings, which matches how they were signed.
pub struct CallbackPayload(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for CallbackPayload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);

        if is_form {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(Self(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect(),
            ));
        }

        let Json(payload) = Json::<Map<String, Value>>::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(Self(payload))
    }
}

/// POST /callback - SecurePay server-to-server payment status.
pub async fn handle_callback(
    State(state): State<CallbackAppState>,
    CallbackPayload(payload): CallbackPayload,
) -> impl IntoResponse {
    if !state.client.verify_callback(&payload, None) {
        tracing::warn!("SecurePay callback rejected: invalid signature");
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Invalid signature" })),
        )
            .into_response();
    }

    let payment = state.client.parse_callback(&payload);
    tracing::info!(
        order_number = %payment.order_number,
        status = %payment.status,
        "SecurePay callback verified"
    );

    match payment.outcome() {
        CallbackOutcome::Successful => state.events.payment_successful(payment, payload).await,
        CallbackOutcome::Failed => state.events.payment_failed(payment, payload).await,
    }

    (StatusCode::OK, Json(json!({ "ok": true }))).into_response()
}

/// GET /redirect - customer browser return after checkout.
pub async fn handle_redirect(
    State(state): State<CallbackAppState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let payload: Map<String, Value> = params
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();

    let payment = state.client.parse_callback(&payload);

    let destination = match payment.outcome() {
        CallbackOutcome::Successful => &state.success_url,
        CallbackOutcome::Failed => &state.failure_url,
    };

    let url = append_query(
        destination,
        &[
            ("status", &payment.status),
            ("order_number", &payment.order_number),
            ("intent_uuid", &payment.intent_uuid),
            ("reference_number", &payment.reference_number),
        ],
    );

    Redirect::to(&url)
}

/// Append query pairs to a URL, percent-encoding values.
fn append_query(url: &str, pairs: &[(&str, &str)]) -> String {
    let mut out = String::from(url);
    for (i, (key, value)) in pairs.iter().enumerate() {
        out.push(if i == 0 && !url.contains('?') { '?' } else { '&' });
        out.push_str(key);
        out.push('=');
        out.push_str(&urlencoding::encode(value));
    }
    out
}

//! Token acquisition and cache management.
//!
//! The gateway issues short-lived bearer tokens through a basic-auth
//! credential exchange. Tokens are cached with a TTL derived from the
//! gateway's reported expiry minus a safety buffer, so the cache entry lapses
//! before the token actually does. A cache hit is returned without any
//! network traffic; the store alone decides expiry.

use chrono::{DateTime, NaiveDateTime, Utc};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;

use crate::ports::{GatewayRequest, RequestAuth};

use super::{Error, SecurePayClient};

/// Timeout for the credential exchange.
pub(super) const AUTH_TIMEOUT: Duration = Duration::from_secs(15);

/// TTL used when the auth response carries no `expired_at`.
const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// Floor for the computed TTL, so a buffer that nearly consumes the token's
/// remaining lifetime cannot produce pathological near-zero caching.
const MIN_TOKEN_TTL_SECS: u64 = 60;

impl SecurePayClient {
    /// Get a bearer token, cached automatically.
    ///
    /// Returns the cached token when present; otherwise performs the
    /// basic-auth exchange against `/v1/auth`, caches the result, and
    /// returns it. Concurrent callers observing an empty cache may each
    /// authenticate; tokens are fungible within their validity window, so
    /// last-write-wins is acceptable.
    ///
    /// # Errors
    ///
    /// [`Error::Authentication`] when credentials are missing, the exchange
    /// returns non-2xx, or the response lacks an `auth_token`.
    pub async fn auth_token(&self) -> Result<String, Error> {
        let key = self.cache_config.token_key();

        if let Some(token) = self.cache.get(&key).await? {
            if !token.is_empty() {
                tracing::debug!("auth token cache hit");
                return Ok(token);
            }
        }

        if self.gateway.client_id.is_empty()
            || self.gateway.client_secret.expose_secret().is_empty()
        {
            return Err(Error::Authentication(
                "client_id or client_secret not configured".to_string(),
            ));
        }

        let response = self
            .transport
            .execute(GatewayRequest {
                method: http::Method::POST,
                url: format!("{}/v1/auth", self.gateway.base_url),
                auth: RequestAuth::Basic {
                    client_id: self.gateway.client_id.clone(),
                    client_secret: self.gateway.client_secret.clone(),
                },
                body: None,
                timeout: AUTH_TIMEOUT,
            })
            .await?;

        if !response.is_success() {
            return Err(Error::Authentication(format!(
                "HTTP {} - {}",
                response.status.as_u16(),
                response.body
            )));
        }

        let data = response
            .json()
            .map_err(|e| Error::Authentication(format!("invalid auth response JSON: {e}")))?;

        let token = data
            .get("auth_token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Authentication("auth response missing auth_token".to_string()))?
            .to_string();

        let ttl = compute_token_ttl(&data, Utc::now().timestamp(), self.cache_config.ttl_buffer_secs);
        self.cache
            .put(&key, &token, Duration::from_secs(ttl))
            .await?;

        tracing::info!(ttl_secs = ttl, environment = %self.gateway.environment, "auth token refreshed");

        Ok(token)
    }

    /// Clear the cached auth token.
    ///
    /// Idempotent: clearing an absent token is a no-op, and a failing cache
    /// delete is logged rather than surfaced.
    pub async fn clear_auth_token(&self) {
        let key = self.cache_config.token_key();
        if let Err(e) = self.cache.delete(&key).await {
            tracing::warn!(error = %e, "failed to clear cached auth token");
        }
    }
}

/// Compute the cache TTL in seconds for a freshly minted token.
///
/// Defaults to one hour; when the auth response reports `expired_at`, the
/// TTL is the remaining lifetime minus the buffer, floored at one minute.
/// An unparseable `expired_at` falls back to the default.
pub(super) fn compute_token_ttl(data: &Value, now_epoch: i64, buffer_secs: u64) -> u64 {
    let expiry = data.get("expired_at").and_then(parse_expiry);

    match expiry {
        Some(expires_epoch) => {
            let remaining = expires_epoch - now_epoch - buffer_secs as i64;
            remaining.max(MIN_TOKEN_TTL_SECS as i64) as u64
        }
        None => DEFAULT_TOKEN_TTL_SECS,
    }
}

/// Parse the gateway's `expired_at` field into a Unix epoch.
///
/// The gateway has been observed to send RFC 3339 timestamps, `YYYY-MM-DD
/// HH:MM:SS` (UTC), and occasionally a bare epoch number.
fn parse_expiry(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.timestamp());
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(naive.and_utc().timestamp());
            }
            None
        }
        _ => None,
    }
}

//! Authenticated request executor.
//!
//! Issues bearer-authorized requests against the gateway and applies the
//! single-retry-on-401 policy: a 401 invalidates the cached token, forces a
//! fresh credential exchange, and reissues the identical request exactly
//! once. The second outcome stands, whatever it is; this handles token
//! staleness (clock skew, cache eviction) without masking persistent
//! authorization failures behind a loop.

use http::{Method, StatusCode};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::ports::{GatewayRequest, GatewayResponse, RequestAuth};

use super::{Error, SecurePayClient};

/// Timeout for domain requests.
pub(super) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

impl SecurePayClient {
    /// Issue an authenticated request against a gateway path.
    ///
    /// `body` rides as a JSON body for POST/PUT/DELETE and as query
    /// parameters for GET. Returns the parsed JSON response body; a bodyless
    /// success yields an empty object.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedMethod`] for methods outside GET/POST/PUT/DELETE
    /// - [`Error::Authentication`] when token acquisition fails
    /// - [`Error::Api`] when the (possibly retried) call does not succeed
    pub async fn authenticated_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, Error> {
        let supported = method == Method::GET
            || method == Method::POST
            || method == Method::PUT
            || method == Method::DELETE;
        if !supported {
            return Err(Error::UnsupportedMethod(method));
        }

        let token = self.auth_token().await?;
        let mut response = self.issue(&method, path, body.clone(), token).await?;

        if response.status == StatusCode::UNAUTHORIZED {
            tracing::debug!(%path, "gateway returned 401, refreshing token and retrying once");
            self.clear_auth_token().await;
            let token = self.auth_token().await?;
            response = self.issue(&method, path, body, token).await?;
        }

        if !response.is_success() {
            return Err(Error::Api {
                method,
                path: path.to_string(),
                status: response.status.as_u16(),
                body: response.body,
            });
        }

        Ok(response.json().unwrap_or_else(|e| {
            tracing::debug!(%path, error = %e, "non-JSON success body, returning empty object");
            Value::Object(Map::new())
        }))
    }

    /// Issue one bearer-authorized request. Called at most twice per
    /// operation by the retry policy above.
    async fn issue(
        &self,
        method: &Method,
        path: &str,
        body: Option<Value>,
        token: String,
    ) -> Result<GatewayResponse, Error> {
        let request = GatewayRequest {
            method: method.clone(),
            url: format!("{}{}", self.gateway.base_url, path),
            auth: RequestAuth::Bearer(token),
            body,
            timeout: REQUEST_TIMEOUT,
        };

        Ok(self.transport.execute(request).await?)
    }
}

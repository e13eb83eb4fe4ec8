//! The authenticated SecurePay API client.
//!
//! [`SecurePayClient`] is an explicitly constructed, immutable value holding
//! the resolved gateway settings; pass it (or an `Arc` of it) to every call
//! site. It owns token acquisition with expiry-aware caching, transparent
//! re-authentication on 401, the domain operations, and callback
//! verification.

mod auth;
mod error;
mod request;

pub use error::Error;

use http::Method;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::config::{AppConfig, CacheConfig, Environment, ResolvedGateway};
use crate::domain::{CallbackVerifier, CreatePaymentRequest, ParsedCallback, PaymentIntent};
use crate::ports::{GatewayTransport, TokenCache};

/// Authenticated client for the SecurePay gateway API.
pub struct SecurePayClient {
    gateway: ResolvedGateway,
    cache_config: CacheConfig,
    cache: Arc<dyn TokenCache>,
    transport: Arc<dyn GatewayTransport>,
    verifier: CallbackVerifier,
}

impl SecurePayClient {
    /// Create a client from resolved gateway settings.
    pub fn new(
        gateway: ResolvedGateway,
        cache_config: CacheConfig,
        cache: Arc<dyn TokenCache>,
        transport: Arc<dyn GatewayTransport>,
    ) -> Self {
        let verifier = CallbackVerifier::new(gateway.client_secret.clone());
        Self {
            gateway,
            cache_config,
            cache,
            transport,
            verifier,
        }
    }

    /// Create a client from loaded configuration.
    pub fn from_config(
        config: &AppConfig,
        cache: Arc<dyn TokenCache>,
        transport: Arc<dyn GatewayTransport>,
    ) -> Self {
        Self::new(
            config.gateway.resolve(),
            config.cache.clone(),
            cache,
            transport,
        )
    }

    /// The active environment.
    pub fn environment(&self) -> Environment {
        self.gateway.environment
    }

    /// The resolved API base URL.
    pub fn base_url(&self) -> &str {
        &self.gateway.base_url
    }

    /// The callback verifier keyed by this client's secret.
    pub fn verifier(&self) -> &CallbackVerifier {
        &self.verifier
    }

    /// Create a payment intent.
    ///
    /// Validates required fields before any network traffic, fills in the
    /// configured callback/redirect defaults, and wraps the gateway response
    /// into a [`PaymentIntent`].
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] naming the first missing field; otherwise the
    /// request executor's errors.
    pub async fn create_payment(
        &self,
        request: CreatePaymentRequest,
    ) -> Result<PaymentIntent, Error> {
        validate_payment_request(&request)?;

        let description = request
            .description
            .unwrap_or_else(|| format!("Payment for {}", request.order_number));
        let callback_url = request
            .callback_url
            .or_else(|| self.gateway.callback_url.clone())
            .unwrap_or_default();
        let redirect_url = request
            .redirect_url
            .or_else(|| self.gateway.redirect_url.clone())
            .unwrap_or_default();

        let payload = json!({
            "order_number": request.order_number,
            "buyer_name": request.buyer_name,
            "buyer_email": request.buyer_email,
            "buyer_phone": request.buyer_phone,
            "amount": request.amount,
            "description": description,
            "callback_url": callback_url,
            "redirect_url": redirect_url,
        });

        let response = self
            .authenticated_request(Method::POST, "/v1/payment/intents", Some(payload))
            .await?;

        let intent = PaymentIntent::from_response(response);
        tracing::info!(
            intent_uuid = %intent.uuid,
            order_number = %intent.order_number,
            successful = intent.is_successful(),
            "payment intent created"
        );

        Ok(intent)
    }

    /// Get payment status by intent UUID.
    pub async fn payment_status(&self, intent_uuid: &str) -> Result<Value, Error> {
        self.authenticated_request(
            Method::GET,
            &format!("/v1/payment/intents/{intent_uuid}"),
            None,
        )
        .await
    }

    /// Get the bank list for a gateway and type (e.g. `fpx`/`b2c`,
    /// `direct_debit`/`b2b1`, `duitnow`/`retail`).
    ///
    /// Response shape varies across gateways: the retail list may be nested
    /// under `banks.retail`, flat under `banks`, or absent entirely; each
    /// layer falls through to the next.
    pub async fn banks(&self, gateway: &str, bank_type: &str) -> Result<Value, Error> {
        let data = self
            .authenticated_request(
                Method::GET,
                &format!("/v1/paynet/{gateway}/banks/{bank_type}"),
                None,
            )
            .await?;

        if let Some(banks) = data.get("banks") {
            if let Some(retail) = banks.get("retail") {
                return Ok(retail.clone());
            }
            return Ok(banks.clone());
        }

        Ok(data)
    }

    /// Get the FPX retail (B2C) bank list, the common case.
    pub async fn fpx_banks(&self) -> Result<Value, Error> {
        self.banks("fpx", "b2c").await
    }

    /// Verify a callback payload using HMAC-SHA256.
    ///
    /// See [`CallbackVerifier::verify`]; an unsigned payload is untrusted,
    /// not an error.
    pub fn verify_callback(&self, payload: &Map<String, Value>, signature: Option<&str>) -> bool {
        self.verifier.verify(payload, signature)
    }

    /// Parse callback payment data into its normalized form.
    pub fn parse_callback(&self, payload: &Map<String, Value>) -> ParsedCallback {
        self.verifier.parse(payload)
    }
}

/// Check required create-payment fields, failing on the first missing one.
fn validate_payment_request(request: &CreatePaymentRequest) -> Result<(), Error> {
    let checks: [(&'static str, bool); 5] = [
        ("order_number", request.order_number.is_empty()),
        ("buyer_name", request.buyer_name.is_empty()),
        ("buyer_email", request.buyer_email.is_empty()),
        ("buyer_phone", request.buyer_phone.is_empty()),
        ("amount", request.amount <= 0),
    ];

    for (field, missing) in checks {
        if missing {
            return Err(Error::Validation { field });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::InMemoryTokenCache;
    use crate::adapters::transport::{MockTransport, ScriptedResponse};
    use crate::config::{Credentials, EnvironmentCredentials, GatewayConfig};
    use http::StatusCode;
    use secrecy::SecretString;

    fn gateway_config(client_id: &str, client_secret: &str) -> GatewayConfig {
        GatewayConfig {
            credentials: EnvironmentCredentials {
                sandbox: Credentials {
                    client_id: client_id.to_string(),
                    client_secret: SecretString::new(client_secret.to_string()),
                },
                ..Default::default()
            },
            callback_url: Some("https://merchant.example/callback".to_string()),
            redirect_url: Some("https://merchant.example/redirect".to_string()),
            ..Default::default()
        }
    }

    fn client_with(
        transport: Arc<MockTransport>,
        cache: Arc<InMemoryTokenCache>,
    ) -> SecurePayClient {
        SecurePayClient::new(
            gateway_config("client-id", "client-secret").resolve(),
            CacheConfig::default(),
            cache,
            transport,
        )
    }

    fn auth_ok(token: &str) -> ScriptedResponse {
        ScriptedResponse::new(
            StatusCode::OK,
            format!(r#"{{"auth_token":"{token}"}}"#),
        )
    }

    // ── Authentication ──────────────────────────────────────────────────

    #[tokio::test]
    async fn cached_token_skips_network() {
        let transport = Arc::new(MockTransport::new());
        let cache = Arc::new(InMemoryTokenCache::new());
        cache
            .put(
                "securepay_auth_token",
                "cached-token",
                std::time::Duration::from_secs(600),
            )
            .await
            .unwrap();

        let client = client_with(transport.clone(), cache);
        let token = client.auth_token().await.unwrap();

        assert_eq!(token, "cached-token");
        assert_eq!(transport.calls().len(), 0);
    }

    #[tokio::test]
    async fn empty_cache_triggers_one_exchange_and_populates_cache() {
        let transport = Arc::new(MockTransport::new());
        transport.push(auth_ok("fresh-token"));
        let cache = Arc::new(InMemoryTokenCache::new());

        let client = client_with(transport.clone(), cache.clone());
        let token = client.auth_token().await.unwrap();

        assert_eq!(token, "fresh-token");
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, Method::POST);
        assert!(calls[0].url.ends_with("/v1/auth"));
        assert_eq!(
            cache.get("securepay_auth_token").await.unwrap().as_deref(),
            Some("fresh-token")
        );
        // Default TTL when no expired_at is reported
        assert_eq!(
            cache.ttl_secs("securepay_auth_token"),
            Some(3600)
        );
    }

    #[tokio::test]
    async fn auth_fails_without_credentials_before_network() {
        let transport = Arc::new(MockTransport::new());
        let client = SecurePayClient::new(
            gateway_config("", "").resolve(),
            CacheConfig::default(),
            Arc::new(InMemoryTokenCache::new()),
            transport.clone(),
        );

        let err = client.auth_token().await.unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
        assert_eq!(transport.calls().len(), 0);
    }

    #[tokio::test]
    async fn auth_fails_on_non_success_status() {
        let transport = Arc::new(MockTransport::new());
        transport.push(ScriptedResponse::new(
            StatusCode::FORBIDDEN,
            r#"{"error":"bad credentials"}"#,
        ));

        let client = client_with(transport, Arc::new(InMemoryTokenCache::new()));
        let err = client.auth_token().await.unwrap_err();

        match err {
            Error::Authentication(msg) => {
                assert!(msg.contains("403"));
                assert!(msg.contains("bad credentials"));
            }
            other => panic!("expected Authentication, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn auth_fails_when_token_field_missing() {
        let transport = Arc::new(MockTransport::new());
        transport.push(ScriptedResponse::new(StatusCode::OK, r#"{"expires":1}"#));

        let client = client_with(transport, Arc::new(InMemoryTokenCache::new()));
        let err = client.auth_token().await.unwrap_err();

        assert!(matches!(err, Error::Authentication(msg) if msg.contains("auth_token")));
    }

    #[tokio::test]
    async fn token_ttl_derived_from_reported_expiry() {
        let transport = Arc::new(MockTransport::new());
        let expires = chrono::Utc::now().timestamp() + 7200;
        transport.push(ScriptedResponse::new(
            StatusCode::OK,
            format!(r#"{{"auth_token":"tok","expired_at":{expires}}}"#),
        ));
        let cache = Arc::new(InMemoryTokenCache::new());

        let client = client_with(transport, cache.clone());
        client.auth_token().await.unwrap();

        // 7200s lifetime minus the 60s buffer, with slack for test runtime
        let ttl = cache.ttl_secs("securepay_auth_token").unwrap();
        assert!((7130..=7140).contains(&ttl), "unexpected ttl {ttl}");
    }

    // ── Request executor ────────────────────────────────────────────────

    #[tokio::test]
    async fn retries_once_on_401_with_fresh_token() {
        let transport = Arc::new(MockTransport::new());
        transport.push(auth_ok("stale-token"));
        transport.push(ScriptedResponse::new(StatusCode::UNAUTHORIZED, ""));
        transport.push(auth_ok("new-token"));
        transport.push(ScriptedResponse::new(StatusCode::OK, r#"{"status":"ok"}"#));

        let cache = Arc::new(InMemoryTokenCache::new());
        let client = client_with(transport.clone(), cache.clone());

        let result = client
            .authenticated_request(Method::GET, "/v1/payment/intents/x", None)
            .await
            .unwrap();

        assert_eq!(result["status"], "ok");

        let calls = transport.calls();
        assert_eq!(calls.len(), 4);
        assert!(calls[0].url.ends_with("/v1/auth"));
        assert_eq!(calls[1].bearer_token(), Some("stale-token"));
        assert!(calls[2].url.ends_with("/v1/auth"));
        assert_eq!(calls[3].bearer_token(), Some("new-token"));
        // Cache holds the refreshed token
        assert_eq!(
            cache.get("securepay_auth_token").await.unwrap().as_deref(),
            Some("new-token")
        );
    }

    #[tokio::test]
    async fn second_401_surfaces_as_api_error() {
        let transport = Arc::new(MockTransport::new());
        transport.push(auth_ok("t1"));
        transport.push(ScriptedResponse::new(StatusCode::UNAUTHORIZED, "denied"));
        transport.push(auth_ok("t2"));
        transport.push(ScriptedResponse::new(StatusCode::UNAUTHORIZED, "denied"));

        let client = client_with(transport.clone(), Arc::new(InMemoryTokenCache::new()));
        let err = client
            .authenticated_request(Method::GET, "/v1/payment/intents/x", None)
            .await
            .unwrap_err();

        match err {
            Error::Api { status, path, .. } => {
                assert_eq!(status, 401);
                assert_eq!(path, "/v1/payment/intents/x");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        // auth, request, re-auth, retry - and nothing after
        assert_eq!(transport.calls().len(), 4);
    }

    #[tokio::test]
    async fn non_success_surfaces_as_api_error_with_diagnostics() {
        let transport = Arc::new(MockTransport::new());
        transport.push(auth_ok("tok"));
        transport.push(ScriptedResponse::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"error":"amount invalid"}"#,
        ));

        let client = client_with(transport, Arc::new(InMemoryTokenCache::new()));
        let err = client
            .authenticated_request(Method::POST, "/v1/payment/intents", Some(json!({})))
            .await
            .unwrap_err();

        match err {
            Error::Api {
                method,
                path,
                status,
                body,
            } => {
                assert_eq!(method, Method::POST);
                assert_eq!(path, "/v1/payment/intents");
                assert_eq!(status, 422);
                assert!(body.contains("amount invalid"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unsupported_method_is_rejected_without_network() {
        let transport = Arc::new(MockTransport::new());
        let client = client_with(transport.clone(), Arc::new(InMemoryTokenCache::new()));

        let err = client
            .authenticated_request(Method::PATCH, "/v1/anything", None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::UnsupportedMethod(m) if m == Method::PATCH));
        assert_eq!(transport.calls().len(), 0);
    }

    #[tokio::test]
    async fn empty_success_body_yields_empty_object() {
        let transport = Arc::new(MockTransport::new());
        transport.push(auth_ok("tok"));
        transport.push(ScriptedResponse::new(StatusCode::OK, ""));

        let client = client_with(transport, Arc::new(InMemoryTokenCache::new()));
        let result = client
            .authenticated_request(Method::DELETE, "/v1/payment/intents/x", None)
            .await
            .unwrap();

        assert_eq!(result, Value::Object(Map::new()));
    }

    // ── Domain operations ───────────────────────────────────────────────

    fn payment_request() -> CreatePaymentRequest {
        CreatePaymentRequest {
            order_number: "ORD1".to_string(),
            buyer_name: "Aisyah".to_string(),
            buyer_email: "aisyah@example.my".to_string(),
            buyer_phone: "+60123456789".to_string(),
            amount: 1500,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_payment_wraps_intent_response() {
        let transport = Arc::new(MockTransport::new());
        transport.push(auth_ok("tok"));
        transport.push(ScriptedResponse::new(
            StatusCode::OK,
            r#"{"intent_uuid":"abc-1","checkout_url":"https://pay/x","status":"pending","order_number":"ORD1","amount":"1500"}"#,
        ));

        let client = client_with(transport.clone(), Arc::new(InMemoryTokenCache::new()));
        let intent = client.create_payment(payment_request()).await.unwrap();

        assert_eq!(intent.uuid, "abc-1");
        assert_eq!(intent.checkout_url, "https://pay/x");
        assert_eq!(intent.amount, 1500);
        assert!(intent.is_successful());

        // Payload carried the configured defaults
        let calls = transport.calls();
        let body = calls[1].body.as_ref().unwrap();
        assert_eq!(body["description"], "Payment for ORD1");
        assert_eq!(body["callback_url"], "https://merchant.example/callback");
        assert_eq!(body["redirect_url"], "https://merchant.example/redirect");
    }

    #[tokio::test]
    async fn create_payment_honors_per_call_overrides() {
        let transport = Arc::new(MockTransport::new());
        transport.push(auth_ok("tok"));
        transport.push(ScriptedResponse::new(StatusCode::OK, "{}"));

        let client = client_with(transport.clone(), Arc::new(InMemoryTokenCache::new()));
        let mut request = payment_request();
        request.description = Some("Invoice 42".to_string());
        request.callback_url = Some("https://other.example/cb".to_string());

        client.create_payment(request).await.unwrap();

        let calls = transport.calls();
        let body = calls[1].body.as_ref().unwrap();
        assert_eq!(body["description"], "Invoice 42");
        assert_eq!(body["callback_url"], "https://other.example/cb");
    }

    #[tokio::test]
    async fn create_payment_validates_each_required_field() {
        let transport = Arc::new(MockTransport::new());
        let client = client_with(transport.clone(), Arc::new(InMemoryTokenCache::new()));

        let cases: [(&str, Box<dyn Fn(&mut CreatePaymentRequest)>); 5] = [
            ("order_number", Box::new(|r| r.order_number.clear())),
            ("buyer_name", Box::new(|r| r.buyer_name.clear())),
            ("buyer_email", Box::new(|r| r.buyer_email.clear())),
            ("buyer_phone", Box::new(|r| r.buyer_phone.clear())),
            ("amount", Box::new(|r| r.amount = 0)),
        ];

        for (expected_field, mutate) in cases {
            let mut request = payment_request();
            mutate(&mut request);

            let err = client.create_payment(request).await.unwrap_err();
            assert!(
                matches!(err, Error::Validation { field } if field == expected_field),
                "expected validation error for {expected_field}"
            );
        }

        // Validation fails fast: zero network calls issued
        assert_eq!(transport.calls().len(), 0);
    }

    #[tokio::test]
    async fn payment_status_hits_intent_path() {
        let transport = Arc::new(MockTransport::new());
        transport.push(auth_ok("tok"));
        transport.push(ScriptedResponse::new(
            StatusCode::OK,
            r#"{"status":"successful"}"#,
        ));

        let client = client_with(transport.clone(), Arc::new(InMemoryTokenCache::new()));
        let status = client.payment_status("abc-1").await.unwrap();

        assert_eq!(status["status"], "successful");
        assert!(transport.calls()[1]
            .url
            .ends_with("/v1/payment/intents/abc-1"));
    }

    #[tokio::test]
    async fn banks_returns_nested_retail_list() {
        let transport = Arc::new(MockTransport::new());
        transport.push(auth_ok("tok"));
        transport.push(ScriptedResponse::new(
            StatusCode::OK,
            r#"{"banks":{"retail":[{"code":"MBB0227","name":"Maybank"}]}}"#,
        ));

        let client = client_with(transport.clone(), Arc::new(InMemoryTokenCache::new()));
        let banks = client.fpx_banks().await.unwrap();

        assert_eq!(banks[0]["code"], "MBB0227");
        assert!(transport.calls()[1].url.ends_with("/v1/paynet/fpx/banks/b2c"));
    }

    #[tokio::test]
    async fn banks_falls_back_to_flat_list() {
        let transport = Arc::new(MockTransport::new());
        transport.push(auth_ok("tok"));
        transport.push(ScriptedResponse::new(
            StatusCode::OK,
            r#"{"banks":[{"code":"BIMB0340"}]}"#,
        ));

        let client = client_with(transport, Arc::new(InMemoryTokenCache::new()));
        let banks = client.banks("fpx", "b2b1").await.unwrap();

        assert_eq!(banks[0]["code"], "BIMB0340");
    }

    #[tokio::test]
    async fn banks_falls_back_to_whole_body() {
        let transport = Arc::new(MockTransport::new());
        transport.push(auth_ok("tok"));
        transport.push(ScriptedResponse::new(
            StatusCode::OK,
            r#"{"other":"shape"}"#,
        ));

        let client = client_with(transport, Arc::new(InMemoryTokenCache::new()));
        let banks = client.banks("duitnow", "retail").await.unwrap();

        assert_eq!(banks["other"], "shape");
    }

    // ── Callback delegation ─────────────────────────────────────────────

    #[tokio::test]
    async fn callback_scenario_verifies_and_classifies() {
        let client = client_with(
            Arc::new(MockTransport::new()),
            Arc::new(InMemoryTokenCache::new()),
        );

        let mut payload = json!({
            "payment": { "status": "successful", "order_number": "ORD1" }
        })
        .as_object()
        .unwrap()
        .clone();
        let checksum = client.verifier().compute_checksum(&payload);
        payload.insert("checksum".to_string(), Value::String(checksum));

        assert!(client.verify_callback(&payload, None));
        let parsed = client.parse_callback(&payload);
        assert_eq!(parsed.status, "successful");
        assert_eq!(
            parsed.outcome(),
            crate::domain::CallbackOutcome::Successful
        );
    }
}

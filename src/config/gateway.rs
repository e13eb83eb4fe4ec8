//! Gateway configuration
//!
//! Selects the active SecurePay environment and resolves the base URL and
//! client credentials for it. Credentials come from the SecurePay console
//! (Developer Tools → API Credentials).

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// SecurePay environment selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Sandbox environment for testing.
    #[default]
    Sandbox,

    /// Production environment for live payments.
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Sandbox => write!(f, "sandbox"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Client credentials for one environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    /// API client id.
    #[serde(default)]
    pub client_id: String,

    /// API client secret. Also keys the callback HMAC.
    #[serde(default = "empty_secret")]
    pub client_secret: SecretString,
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: empty_secret(),
        }
    }
}

impl Credentials {
    fn is_complete(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.expose_secret().is_empty()
    }
}

/// Per-environment credential pairs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentCredentials {
    #[serde(default)]
    pub sandbox: Credentials,

    #[serde(default)]
    pub production: Credentials,
}

/// Per-environment API base URLs.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentUrls {
    #[serde(default = "default_sandbox_url")]
    pub sandbox: String,

    #[serde(default = "default_production_url")]
    pub production: String,
}

impl Default for EnvironmentUrls {
    fn default() -> Self {
        Self {
            sandbox: default_sandbox_url(),
            production: default_production_url(),
        }
    }
}

fn default_sandbox_url() -> String {
    "https://sandbox.securepay.dev/api".to_string()
}

fn default_production_url() -> String {
    "https://console.securepay.my/api".to_string()
}

/// Gateway configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayConfig {
    /// Active environment (sandbox or production).
    #[serde(default)]
    pub environment: Environment,

    /// Credentials per environment.
    #[serde(default)]
    pub credentials: EnvironmentCredentials,

    /// API base URLs per environment.
    #[serde(default)]
    pub urls: EnvironmentUrls,

    /// Default URL SecurePay POSTs payment status to (server-to-server).
    #[serde(default)]
    pub callback_url: Option<String>,

    /// Default URL the customer is redirected to after payment.
    #[serde(default)]
    pub redirect_url: Option<String>,
}

impl GatewayConfig {
    /// Resolve the base URL and credentials for the active environment.
    pub fn resolve(&self) -> ResolvedGateway {
        let (base_url, credentials) = match self.environment {
            Environment::Sandbox => (&self.urls.sandbox, &self.credentials.sandbox),
            Environment::Production => (&self.urls.production, &self.credentials.production),
        };

        ResolvedGateway {
            environment: self.environment,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
            callback_url: self.callback_url.clone(),
            redirect_url: self.redirect_url.clone(),
        }
    }

    /// Validate gateway configuration for the active environment.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let resolved = self.resolve();

        if resolved.client_id.is_empty() {
            return Err(ValidationError::MissingRequired("gateway client_id"));
        }
        if resolved.client_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("gateway client_secret"));
        }
        if !resolved.base_url.starts_with("http://") && !resolved.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }

        Ok(())
    }

    /// Check whether the active environment has credentials configured.
    pub fn has_credentials(&self) -> bool {
        match self.environment {
            Environment::Sandbox => self.credentials.sandbox.is_complete(),
            Environment::Production => self.credentials.production.is_complete(),
        }
    }
}

/// Gateway settings resolved for the active environment.
///
/// This is what [`crate::client::SecurePayClient`] carries for the lifetime
/// of the process: one base URL, one credential pair, immutable.
#[derive(Clone)]
pub struct ResolvedGateway {
    pub environment: Environment,
    pub base_url: String,
    pub client_id: String,
    pub client_secret: SecretString,
    pub callback_url: Option<String>,
    pub redirect_url: Option<String>,
}

impl std::fmt::Debug for ResolvedGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedGateway")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

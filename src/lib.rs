//! SecurePay gateway client.
//!
//! Server-side client for the SecurePay payment gateway: client-credential
//! authentication with cached, expiry-aware bearer tokens, payment intent
//! creation and status queries, bank list retrieval, and HMAC-SHA256
//! callback verification with constant-time comparison.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use securepay::adapters::cache::InMemoryTokenCache;
//! use securepay::adapters::transport::ReqwestTransport;
//! use securepay::client::SecurePayClient;
//! use securepay::config::AppConfig;
//! use securepay::domain::CreatePaymentRequest;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! config.validate()?;
//!
//! let client = SecurePayClient::from_config(
//!     &config,
//!     Arc::new(InMemoryTokenCache::new()),
//!     Arc::new(ReqwestTransport::new()),
//! );
//!
//! let intent = client
//!     .create_payment(CreatePaymentRequest {
//!         order_number: "ORD-1001".into(),
//!         buyer_name: "Aisyah binti Ahmad".into(),
//!         buyer_email: "aisyah@example.my".into(),
//!         buyer_phone: "+60123456789".into(),
//!         amount: 1500, // RM15.00
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! if intent.is_successful() {
//!     println!("checkout at {}", intent.checkout_url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod client;
pub mod config;
pub mod domain;
pub mod ports;

//! HTTP glue exposing the callback and redirect endpoints.
//!
//! # Security
//!
//! - Callback signatures are verified before any classification; a bad
//!   signature is a 403, never an event.
//! - Redirect payloads are classification-only (no signature in the
//!   reference behavior) and must not be trusted for fulfilment.

mod handlers;
mod routes;

pub use handlers::{handle_callback, handle_redirect, CallbackAppState, CallbackPayload};
pub use routes::securepay_routes;

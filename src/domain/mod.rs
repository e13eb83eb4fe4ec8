//! Domain types for payments and callbacks.

mod callback;
mod payment;

pub use callback::{canonical_json, CallbackOutcome, CallbackVerifier, ParsedCallback};
pub use payment::{CreatePaymentRequest, PaymentIntent};

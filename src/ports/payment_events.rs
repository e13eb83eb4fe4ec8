//! Payment event notification port.
//!
//! After a callback is verified and classified, the host application decides
//! what happens next (fulfil the order, alert, write a ledger entry). This
//! port is that seam: the HTTP glue invokes it, the host implements it.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::ParsedCallback;

/// Port for notifying the host application of classified payment outcomes.
#[async_trait]
pub trait PaymentEvents: Send + Sync {
    /// A verified callback reported a successful payment.
    async fn payment_successful(&self, payment: ParsedCallback, raw: Map<String, Value>);

    /// A verified callback reported a failed (non-successful) payment.
    async fn payment_failed(&self, payment: ParsedCallback, raw: Map<String, Value>);
}

/// No-op event sink for hosts that poll payment status instead.
pub struct NullPaymentEvents;

#[async_trait]
impl PaymentEvents for NullPaymentEvents {
    async fn payment_successful(&self, payment: ParsedCallback, _raw: Map<String, Value>) {
        tracing::debug!(order_number = %payment.order_number, "payment successful (unhandled)");
    }

    async fn payment_failed(&self, payment: ParsedCallback, _raw: Map<String, Value>) {
        tracing::debug!(order_number = %payment.order_number, "payment failed (unhandled)");
    }
}

//! Payment intent types.
//!
//! A payment intent is the gateway-side record of an initiated payment. The
//! client creates one, hands the customer its checkout URL, and later learns
//! the outcome through a callback.

use serde::Serialize;
use serde_json::Value;

/// Request to create a payment intent.
///
/// Amounts are in minor units (e.g. 1500 = RM15.00). Description and the
/// callback/redirect URLs fall back to configured defaults when absent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreatePaymentRequest {
    /// Merchant order number.
    pub order_number: String,

    /// Buyer's full name.
    pub buyer_name: String,

    /// Buyer's email address.
    pub buyer_email: String,

    /// Buyer's phone number.
    pub buyer_phone: String,

    /// Amount in minor units.
    pub amount: i64,

    /// Free-text description; defaults to `Payment for {order_number}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Per-call callback URL override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,

    /// Per-call redirect URL override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

/// A created payment intent as returned by the gateway.
///
/// A deformed creation (no checkout URL) is represented, not rejected:
/// [`PaymentIntent::is_successful`] reports it.
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    /// Intent UUID assigned by the gateway.
    pub uuid: String,

    /// URL for the customer to complete checkout.
    pub checkout_url: String,

    /// Gateway-defined status string.
    pub status: String,

    /// Merchant order number echoed back.
    pub order_number: String,

    /// Amount in minor units.
    pub amount: i64,

    /// Full response body as received.
    raw: Value,
}

impl PaymentIntent {
    /// Build an intent from the gateway's create-payment response.
    ///
    /// The gateway has been observed to return the identifier as either
    /// `intent_uuid` or `uuid`, and the amount as either a JSON number or a
    /// numeric string; both shapes are accepted.
    pub fn from_response(data: Value) -> Self {
        let uuid = str_field(&data, "intent_uuid")
            .or_else(|| str_field(&data, "uuid"))
            .unwrap_or_default();
        let checkout_url = str_field(&data, "checkout_url").unwrap_or_default();
        let status = str_field(&data, "status").unwrap_or_else(|| "pending".to_string());
        let order_number = str_field(&data, "order_number").unwrap_or_default();
        let amount = amount_field(&data);

        Self {
            uuid,
            checkout_url,
            status,
            order_number,
            amount,
            raw: data,
        }
    }

    /// Check if the intent was created successfully.
    ///
    /// An intent without a checkout URL is a failed creation.
    pub fn is_successful(&self) -> bool {
        !self.checkout_url.is_empty()
    }

    /// The raw response body.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Consume the intent, returning the raw response body.
    pub fn into_raw(self) -> Value {
        self.raw
    }
}

fn str_field(data: &Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn amount_field(data: &Value) -> i64 {
    match data.get("amount") {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

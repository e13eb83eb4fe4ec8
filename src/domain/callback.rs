//! Callback signature verification and payload parsing.
//!
//! SecurePay reports payment outcomes two ways: a server-to-server callback
//! POST and a customer browser redirect. Callbacks carry an HMAC-SHA256
//! checksum keyed by the client secret; verification uses constant-time
//! comparison and a pinned canonical JSON serialization so the digest is
//! reproducible regardless of map iteration order.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Payload keys that carry the signature itself and are excluded from the
/// digest input.
const SIGNATURE_KEYS: [&str; 2] = ["checksum", "signature"];

/// Verifier for SecurePay callback checksums.
pub struct CallbackVerifier {
    /// The client secret, which doubles as the HMAC key.
    secret: SecretString,
}

impl CallbackVerifier {
    /// Creates a new verifier keyed by the client secret.
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Verifies a callback payload against its HMAC-SHA256 checksum.
    ///
    /// The signature is taken from `signature` if supplied, else from the
    /// payload's `checksum` field, else its `signature` field. An unsigned
    /// payload is untrusted, not an error: the result is simply `false`.
    ///
    /// # Verification Steps
    ///
    /// 1. Resolve the supplied signature
    /// 2. Strip the signature keys from the payload
    /// 3. Serialize the remainder as canonical JSON
    /// 4. Compute HMAC-SHA256 keyed by the client secret
    /// 5. Compare hex digests using constant-time comparison
    pub fn verify(&self, payload: &Map<String, Value>, signature: Option<&str>) -> bool {
        let provided = match signature.or_else(|| supplied_signature(payload)) {
            Some(s) if !s.is_empty() => s,
            _ => return false,
        };

        let mut data = payload.clone();
        for key in SIGNATURE_KEYS {
            data.remove(key);
        }

        let computed = self.compute_checksum(&data);

        constant_time_compare(computed.as_bytes(), provided.as_bytes())
    }

    /// Computes the hex-encoded HMAC-SHA256 checksum for a payload.
    pub fn compute_checksum(&self, data: &Map<String, Value>) -> String {
        let canonical = canonical_json(&Value::Object(data.clone()));

        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(canonical.as_bytes());

        hex::encode(mac.finalize().into_bytes())
    }

    /// Parses a callback or redirect payload into its normalized form.
    ///
    /// The payment fields live in a nested `payment` object when present,
    /// else in the payload itself.
    pub fn parse(&self, payload: &Map<String, Value>) -> ParsedCallback {
        ParsedCallback::from_payload(payload)
    }
}

fn supplied_signature(payload: &Map<String, Value>) -> Option<&str> {
    SIGNATURE_KEYS
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_str))
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Serializes a JSON value with recursively sorted object keys and compact
/// separators.
///
/// The gateway's checksum is computed over a specific serialization; pinning
/// key order here keeps the digest stable no matter how the payload map was
/// built, and independent of serde_json's `preserve_order` feature.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();

            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // serde_json string serialization handles escaping
                out.push_str(&serde_json::to_string(key).expect("string serializes"));
                out.push(':');
                write_canonical(&map[key.as_str()], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => {
            out.push_str(&serde_json::to_string(scalar).expect("scalar serializes"));
        }
    }
}

/// Normalized view of a callback or redirect payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCallback {
    /// Payment status; `"unknown"` when absent.
    pub status: String,

    /// Gateway reference number.
    pub reference_number: String,

    /// Intent UUID the payment belongs to.
    pub intent_uuid: String,

    /// Merchant order number.
    pub order_number: String,
}

impl ParsedCallback {
    /// Extracts the payment fields from a raw payload.
    pub fn from_payload(payload: &Map<String, Value>) -> Self {
        let payment = payload
            .get("payment")
            .and_then(Value::as_object)
            .unwrap_or(payload);

        Self {
            status: text(payment, "status").unwrap_or_else(|| "unknown".to_string()),
            reference_number: text(payment, "reference_number").unwrap_or_default(),
            intent_uuid: text(payment, "intent_uuid").unwrap_or_default(),
            order_number: text(payment, "order_number")
                .or_else(|| text(payload, "order_number"))
                .unwrap_or_default(),
        }
    }

    /// Classifies the payment outcome.
    pub fn outcome(&self) -> CallbackOutcome {
        if self.status == "successful" {
            CallbackOutcome::Successful
        } else {
            CallbackOutcome::Failed
        }
    }
}

fn text(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Classification of a verified callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackOutcome {
    /// The payment completed successfully.
    Successful,

    /// The payment failed or ended in any non-successful status.
    Failed,
}

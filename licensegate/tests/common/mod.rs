//! Shared test helpers for license tests.

#![allow(dead_code)]

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;

pub const SECRET: &str = "s3cr3t";

/// Fixed instant used by clock-injected tests: 2030-06-15T12:00:00Z.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 6, 15, 12, 0, 0).unwrap()
}

/// Signs `claims` as an HS256 token.
pub fn sign_token(claims: &Value, secret: &str) -> String {
    sign_with_header(&json!({"alg": "HS256", "typ": "JWT"}), claims, secret)
}

/// Signs `claims` under an arbitrary header using HMAC-SHA256, whatever the
/// header claims the algorithm is.
pub fn sign_with_header(header: &Value, claims: &Value, secret: &str) -> String {
    let header_b64 = URL_SAFE_NO_PAD.encode(header.to_string().as_bytes());
    let payload_b64 = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
    sign_raw(&header_b64, &payload_b64, secret)
}

/// Signs pre-encoded segments: `header_b64.payload_b64.base64url(hmac)`.
pub fn sign_raw(header_b64: &str, payload_b64: &str, secret: &str) -> String {
    let signing_input = format!("{header_b64}.{payload_b64}");
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(signing_input.as_bytes());
    let sig_b64 = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    format!("{signing_input}.{sig_b64}")
}

/// The claims an issuer produces for `acme`.
pub fn acme_claims(expires_at: &str) -> Value {
    json!({
        "customer_id": "acme",
        "expires_at": expires_at,
        "issued_at": "2024-01-01T00:00:00.000Z",
        "features": ["x", "y"],
    })
}

/// A token valid until 2099 signed with [`SECRET`].
pub fn make_valid_token() -> String {
    sign_token(&acme_claims("2099-01-01T00:00:00Z"), SECRET)
}

/// A token whose `expires_at` passed in 2000, signed with [`SECRET`].
pub fn make_expired_token() -> String {
    sign_token(&acme_claims("2000-01-01T00:00:00Z"), SECRET)
}

//! Compact JWS decoding with HMAC-SHA256 verification.
//!
//! Tokens use the format: `base64url(header).base64url(payload).base64url(signature)`
//!
//! The signature covers the ASCII bytes `header_b64 "." payload_b64`. Only
//! `HS256` is accepted; the header cannot select another algorithm.
//!
//! After the signature checks out, the registered claims are validated in
//! the order `iat`, `nbf`, `exp`. Each must be numeric when present.

use crate::error::{LicenseError, LicenseResult};
use crate::secret::SecretKey;
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::{Map, Value};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// The only algorithm a license token may declare.
pub const ALGORITHM: &str = "HS256";

/// base64url that accepts segments with or without `=` padding.
const SEGMENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decoded JOSE header.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenHeader {
    /// Signing algorithm.
    pub alg: String,
    /// Media type, usually `JWT`.
    #[serde(default)]
    pub typ: Option<String>,
}

/// Verifies `token` against `secret` and returns its claims object.
///
/// # Errors
///
/// Returns [`LicenseError::InvalidSignature`] for malformed tokens,
/// disallowed algorithms, bad signatures, and invalid registered claims,
/// and [`LicenseError::TokenExpired`] when `exp` is not after `now`.
pub fn decode_hs256(
    token: &str,
    secret: &SecretKey,
    now: DateTime<Utc>,
) -> LicenseResult<Map<String, Value>> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(LicenseError::InvalidSignature(format!(
            "token must have exactly three segments, found {}",
            parts.len()
        )));
    }

    let header_b64 = parts[0];
    let payload_b64 = parts[1];
    let signature_b64 = parts[2];

    let header_json = SEGMENT_BASE64.decode(header_b64).map_err(|e| {
        LicenseError::InvalidSignature(format!("invalid header base64: {e}"))
    })?;
    let header: TokenHeader = serde_json::from_slice(&header_json).map_err(|e| {
        LicenseError::InvalidSignature(format!("invalid header JSON: {e}"))
    })?;

    if header.alg != ALGORITHM {
        return Err(LicenseError::InvalidSignature(format!(
            "algorithm `{}` is not allowed",
            header.alg
        )));
    }

    let sig_bytes = SEGMENT_BASE64.decode(signature_b64).map_err(|e| {
        LicenseError::InvalidSignature(format!("invalid signature base64: {e}"))
    })?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| LicenseError::InvalidSignature("invalid secret key".to_string()))?;
    let signing_input = &token[..header_b64.len() + 1 + payload_b64.len()];
    mac.update(signing_input.as_bytes());
    mac.verify_slice(&sig_bytes).map_err(|_| {
        LicenseError::InvalidSignature("signature verification failed".to_string())
    })?;

    let payload_json = SEGMENT_BASE64.decode(payload_b64).map_err(|e| {
        LicenseError::InvalidSignature(format!("invalid payload base64: {e}"))
    })?;
    let claims: Map<String, Value> = serde_json::from_slice(&payload_json).map_err(|e| {
        LicenseError::InvalidSignature(format!("payload must be a JSON object: {e}"))
    })?;

    validate_registered_claims(&claims, now)?;
    Ok(claims)
}

fn validate_registered_claims(claims: &Map<String, Value>, now: DateTime<Utc>) -> LicenseResult<()> {
    let now = now.timestamp();

    numeric_claim(claims, "iat", "Issued At")?;

    if let Some(nbf) = numeric_claim(claims, "nbf", "Not Before")? {
        if nbf > now {
            return Err(LicenseError::InvalidSignature(
                "the token is not yet valid (nbf)".to_string(),
            ));
        }
    }

    if let Some(exp) = numeric_claim(claims, "exp", "Expiration Time")? {
        if exp <= now {
            return Err(LicenseError::TokenExpired);
        }
    }

    Ok(())
}

/// Reads a registered time claim as whole seconds. Fractional values are
/// truncated.
fn numeric_claim(claims: &Map<String, Value>, name: &str, label: &str) -> LicenseResult<Option<i64>> {
    let Some(value) = claims.get(name) else {
        return Ok(None);
    };

    let secs = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        _ => None,
    };

    secs.map(Some).ok_or_else(|| {
        LicenseError::InvalidSignature(format!("{label} claim ({name}) must be an integer"))
    })
}

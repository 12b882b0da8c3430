//! License claims carried inside a verified token.

use crate::error::{LicenseError, LicenseResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claims that must be present and non-empty.
const REQUIRED_CLAIMS: [&str; 2] = ["customer_id", "expires_at"];

/// Offset-qualified layouts tried after RFC 3339.
const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
];

/// Layouts without an offset. These are read as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// The license claims (matches the issuer's JSON structure).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseClaims {
    /// Licensee identifier.
    pub customer_id: String,
    /// ISO-8601 expiration boundary.
    pub expires_at: String,
    /// ISO-8601 issue time, informational only.
    #[serde(default)]
    pub issued_at: Option<String>,
    /// Enabled capability flags.
    #[serde(default)]
    pub features: Option<Vec<String>>,
}

impl LicenseClaims {
    /// Builds claims from a verified claims object.
    ///
    /// Presence of the required claims is checked before their types, so a
    /// token missing `customer_id` reports missing fields even if another
    /// claim is malformed.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::MissingClaims`] when a required claim is
    /// absent, `null`, or empty, and [`LicenseError::Claims`] when a claim
    /// has an unexpected type.
    pub fn from_map(claims: Map<String, Value>) -> LicenseResult<Self> {
        let missing = REQUIRED_CLAIMS.iter().any(|name| match claims.get(*name) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        });
        if missing {
            return Err(LicenseError::MissingClaims);
        }

        Ok(serde_json::from_value(Value::Object(claims))?)
    }

    /// Returns the parsed `expires_at` instant.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Validation`] if the timestamp is not ISO-8601.
    pub fn expiry(&self) -> LicenseResult<DateTime<Utc>> {
        parse_timestamp(&self.expires_at).ok_or_else(|| {
            LicenseError::Validation(format!("invalid expires_at timestamp '{}'", self.expires_at))
        })
    }

    /// Returns the features, or an empty list if the claim was absent.
    #[must_use]
    pub fn features(&self) -> Vec<String> {
        self.features.clone().unwrap_or_default()
    }
}

/// Parses an ISO-8601 timestamp into UTC.
///
/// A trailing `Z` is rewritten to `+00:00` first. Timestamps without an
/// offset, including bare dates, are taken as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let normalized = match raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z')) {
        Some(stripped) => format!("{stripped}+00:00"),
        None => raw.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

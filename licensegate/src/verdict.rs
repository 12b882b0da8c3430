//! Verification results.

use crate::error::{InvalidKind, LicenseError};
use serde::{Deserialize, Serialize};

/// A license that passed every check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidLicense {
    pub customer_id: String,
    /// Expiration exactly as it appeared in the token.
    pub expires_at: String,
    pub issued_at: Option<String>,
    pub features: Vec<String>,
    /// Whole days until expiry, rounded down.
    pub days_remaining: i64,
}

/// A rejected license.
///
/// The partial fields are only filled when the token verified and its
/// claims were readable, which today means [`InvalidKind::Expired`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidLicense {
    pub kind: InvalidKind,
    /// Human-readable reason.
    pub error: String,
    pub customer_id: Option<String>,
    pub expires_at: Option<String>,
    pub features: Option<Vec<String>>,
}

impl From<LicenseError> for InvalidLicense {
    fn from(err: LicenseError) -> Self {
        let kind = err.kind();
        let error = err.to_string();
        match err {
            LicenseError::Expired {
                customer_id,
                expires_at,
                features,
            } => Self {
                kind,
                error,
                customer_id: Some(customer_id),
                expires_at: Some(expires_at),
                features: Some(features),
            },
            _ => Self {
                kind,
                error,
                customer_id: None,
                expires_at: None,
                features: None,
            },
        }
    }
}

/// Outcome of verifying a license token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "VerdictReport")]
pub enum Verdict {
    Valid(ValidLicense),
    Invalid(InvalidLicense),
}

impl Verdict {
    /// Returns true for [`Verdict::Valid`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Returns true if the license is valid and grants `feature`.
    #[must_use]
    pub fn has_feature(&self, feature: &str) -> bool {
        match self {
            Self::Valid(license) => license.features.iter().any(|f| f == feature),
            Self::Invalid(_) => false,
        }
    }

    /// Returns the customer, if one was surfaced.
    #[must_use]
    pub fn customer_id(&self) -> Option<&str> {
        match self {
            Self::Valid(license) => Some(&license.customer_id),
            Self::Invalid(invalid) => invalid.customer_id.as_deref(),
        }
    }

    /// Returns the features, if any were surfaced.
    #[must_use]
    pub fn features(&self) -> Option<&[String]> {
        match self {
            Self::Valid(license) => Some(&license.features),
            Self::Invalid(invalid) => invalid.features.as_deref(),
        }
    }

    /// Returns the rejection message for an invalid verdict.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(invalid) => Some(&invalid.error),
        }
    }

    /// Returns the rejection category for an invalid verdict.
    #[must_use]
    pub fn kind(&self) -> Option<InvalidKind> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(invalid) => Some(invalid.kind),
        }
    }

    /// Flattens the verdict into its report form.
    #[must_use]
    pub fn to_report(&self) -> VerdictReport {
        VerdictReport::from(self.clone())
    }
}

impl From<LicenseError> for Verdict {
    fn from(err: LicenseError) -> Self {
        Self::Invalid(err.into())
    }
}

/// Flat JSON shape of a verdict: `{"valid": bool, ...}` with absent fields
/// omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictReport {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
}

impl From<Verdict> for VerdictReport {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Valid(license) => Self {
                valid: true,
                error: None,
                customer_id: Some(license.customer_id),
                expires_at: Some(license.expires_at),
                issued_at: license.issued_at,
                features: Some(license.features),
                days_remaining: Some(license.days_remaining),
            },
            Verdict::Invalid(invalid) => Self {
                valid: false,
                error: Some(invalid.error),
                customer_id: invalid.customer_id,
                expires_at: invalid.expires_at,
                issued_at: None,
                features: invalid.features,
                days_remaining: None,
            },
        }
    }
}

//! Error types for license verification.
//!
//! The `Display` text of every variant is the exact message reported in
//! [`crate::InvalidLicense::error`], so callers that only print the verdict
//! see the same wording the issuing side documents.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Reasons a license token can be rejected.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// The token was empty or whitespace.
    #[error("License key is required and must be a string")]
    MissingKey,

    /// The verification secret was empty.
    #[error("Secret key is required for validation")]
    MissingSecret,

    /// HMAC-SHA256 verification failed or the token is malformed.
    #[error("Invalid license key signature: {0}")]
    InvalidSignature(String),

    /// The token's registered `exp` claim has passed.
    #[error("License has expired")]
    TokenExpired,

    /// `customer_id` or `expires_at` is absent.
    #[error("License key is missing required fields")]
    MissingClaims,

    /// `expires_at` is not in the future. The decoded claims are kept so the
    /// caller can still tell whose license lapsed.
    #[error("License has expired")]
    Expired {
        customer_id: String,
        expires_at: String,
        features: Vec<String>,
    },

    /// Any other decode or parse failure.
    #[error("License validation error: {0}")]
    Validation(String),

    /// Claims did not match the expected types.
    #[error("License validation error: {0}")]
    Claims(#[from] serde_json::Error),

    /// The license file does not exist.
    #[error("License file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The license file exists but could not be read.
    #[error("Failed to read license file: {0}")]
    FileRead(#[source] std::io::Error),
}

impl LicenseError {
    /// Returns the coarse category of this error.
    #[must_use]
    pub fn kind(&self) -> InvalidKind {
        match self {
            Self::MissingKey | Self::MissingSecret => InvalidKind::MissingInput,
            Self::InvalidSignature(_) => InvalidKind::SignatureInvalid,
            Self::TokenExpired => InvalidKind::FormatExpired,
            Self::MissingClaims => InvalidKind::MissingClaims,
            Self::Expired { .. } => InvalidKind::Expired,
            Self::Validation(_) | Self::Claims(_) => InvalidKind::ValidationError,
            Self::FileNotFound(_) => InvalidKind::FileNotFound,
            Self::FileRead(_) => InvalidKind::FileRead,
        }
    }
}

/// Machine-readable category of an invalid verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidKind {
    /// Token or secret absent or empty.
    MissingInput,
    /// Signature mismatch, disallowed algorithm, or malformed token.
    SignatureInvalid,
    /// Rejected by the token's own `exp` claim before claims were read.
    FormatExpired,
    /// Signed correctly but `customer_id` or `expires_at` is missing.
    MissingClaims,
    /// `expires_at` is at or before the current time.
    Expired,
    /// Catch-all for malformed timestamps and unexpected claim types.
    ValidationError,
    /// License file path does not exist.
    FileNotFound,
    /// License file could not be read.
    FileRead,
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;

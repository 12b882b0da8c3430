//! The license verification routine.

use crate::claims::LicenseClaims;
use crate::error::{LicenseError, LicenseResult};
use crate::secret::SecretKey;
use crate::token;
use crate::verdict::{ValidLicense, Verdict};
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Verifies license tokens against one shared secret.
///
/// Holds no state besides the secret, so a single instance can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct LicenseVerifier {
    secret: SecretKey,
}

impl LicenseVerifier {
    /// Creates a verifier for tokens signed with `secret`.
    ///
    /// An empty secret is accepted here and reported by every `verify` call.
    pub fn new(secret: impl Into<SecretKey>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verifies `token` at the current time. Never panics.
    #[must_use]
    pub fn verify(&self, token: &str) -> Verdict {
        self.verify_at(token, Utc::now())
    }

    /// Verifies `token` as if the current time were `now`.
    #[must_use]
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Verdict {
        match self.evaluate(token, now) {
            Ok(license) => {
                debug!(
                    customer_id = %license.customer_id,
                    days_remaining = license.days_remaining,
                    "license verified"
                );
                Verdict::Valid(license)
            }
            Err(err) => {
                debug!(kind = ?err.kind(), "license rejected: {err}");
                err.into()
            }
        }
    }

    /// Reads a token from `path` and verifies it.
    #[must_use]
    pub fn verify_file(&self, path: impl AsRef<Path>) -> Verdict {
        match read_token(path.as_ref()) {
            Ok(token) => self.verify(&token),
            Err(err) => {
                warn!(path = %path.as_ref().display(), "{err}");
                err.into()
            }
        }
    }

    /// Returns true if `token` is currently valid and grants `feature`.
    #[must_use]
    pub fn check_feature(&self, token: &str, feature: &str) -> bool {
        self.verify(token).has_feature(feature)
    }

    fn evaluate(&self, token: &str, now: DateTime<Utc>) -> LicenseResult<ValidLicense> {
        // Only the file wrapper trims; inline tokens are decoded as given.
        if token.is_empty() {
            return Err(LicenseError::MissingKey);
        }
        if self.secret.is_empty() {
            return Err(LicenseError::MissingSecret);
        }

        let claims = token::decode_hs256(token, &self.secret, now)?;
        let claims = LicenseClaims::from_map(claims)?;

        // The token's own `exp` may be absent or looser than `expires_at`.
        let expires_at = claims.expiry()?;
        if expires_at <= now {
            let features = claims.features();
            return Err(LicenseError::Expired {
                customer_id: claims.customer_id,
                expires_at: claims.expires_at,
                features,
            });
        }

        let features = claims.features();
        Ok(ValidLicense {
            customer_id: claims.customer_id,
            expires_at: claims.expires_at,
            issued_at: claims.issued_at,
            features,
            days_remaining: (expires_at - now).num_days(),
        })
    }
}

/// Verifies `token` against `secret` at the current time.
///
/// This is a total function: every input, including hostile tokens, yields
/// a [`Verdict`].
#[must_use]
pub fn verify(token: &str, secret: &str) -> Verdict {
    LicenseVerifier::new(secret).verify(token)
}

/// Reads a token from `path` and verifies it against `secret`.
#[must_use]
pub fn verify_file(path: impl AsRef<Path>, secret: &str) -> Verdict {
    LicenseVerifier::new(secret).verify_file(path)
}

fn read_token(path: &Path) -> LicenseResult<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(contents.trim().to_string()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(LicenseError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => Err(LicenseError::FileRead(e)),
    }
}

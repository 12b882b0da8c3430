//! Property-based tests for license verification.
//!
//! These tests verify properties that must hold for any input:
//! - Arbitrary strings never panic the verifier
//! - Tokens signed with another key never verify
//! - Future expirations verify with the floored day count
//! - Past expirations report the original claims

mod common;

use chrono::Duration;
use common::{fixed_now, sign_token};
use licensegate::{InvalidKind, LicenseVerifier, Verdict};
use proptest::prelude::*;
use serde_json::json;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn secret_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9!@#$%^&*()]{1,64}").unwrap()
}

fn customer_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9-]{0,31}").unwrap()
}

fn features_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::string::string_regex("[a-z_]{1,16}").unwrap(), 0..6)
}

/// Seconds offset from `fixed_now`, at least one second away.
fn future_secs() -> impl Strategy<Value = i64> {
    1i64..(200 * 365 * 24 * 60 * 60)
}

fn rfc3339_at(offset_secs: i64) -> String {
    (fixed_now() + Duration::seconds(offset_secs))
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn arbitrary_tokens_never_verify(token in ".*", secret in ".*") {
        let verdict = LicenseVerifier::new(secret.as_str()).verify_at(&token, fixed_now());
        prop_assert!(!verdict.is_valid());
    }

    #[test]
    fn dotted_garbage_is_signature_error(
        a in "[A-Za-z0-9_-]{0,40}",
        b in "[A-Za-z0-9_-]{0,40}",
        c in "[A-Za-z0-9_-]{0,40}",
    ) {
        let token = format!("{a}.{b}.{c}");
        let verdict = LicenseVerifier::new("s3cr3t").verify_at(&token, fixed_now());
        prop_assert_eq!(verdict.kind(), Some(InvalidKind::SignatureInvalid));
    }

    #[test]
    fn other_key_is_signature_error(
        signer in secret_strategy(),
        verifier in secret_strategy(),
        customer in customer_strategy(),
    ) {
        prop_assume!(signer != verifier);
        let token = sign_token(
            &json!({"customer_id": customer, "expires_at": "2099-01-01T00:00:00Z"}),
            &signer,
        );
        let verdict = LicenseVerifier::new(verifier.as_str()).verify_at(&token, fixed_now());
        prop_assert_eq!(verdict.kind(), Some(InvalidKind::SignatureInvalid));
    }

    #[test]
    fn future_expiry_is_valid(
        secret in secret_strategy(),
        customer in customer_strategy(),
        features in features_strategy(),
        offset in future_secs(),
    ) {
        let expires_at = rfc3339_at(offset);
        let token = sign_token(
            &json!({"customer_id": customer, "expires_at": expires_at, "features": features}),
            &secret,
        );
        match LicenseVerifier::new(secret.as_str()).verify_at(&token, fixed_now()) {
            Verdict::Valid(license) => {
                prop_assert_eq!(license.customer_id, customer);
                prop_assert_eq!(license.expires_at, expires_at);
                prop_assert_eq!(license.features, features);
                prop_assert_eq!(license.days_remaining, offset / (24 * 60 * 60));
            }
            Verdict::Invalid(invalid) => prop_assert!(false, "unexpected: {}", invalid.error),
        }
    }

    #[test]
    fn past_expiry_reports_claims(
        secret in secret_strategy(),
        customer in customer_strategy(),
        features in features_strategy(),
        offset in future_secs(),
    ) {
        let expires_at = rfc3339_at(-offset);
        let token = sign_token(
            &json!({"customer_id": customer, "expires_at": expires_at, "features": features}),
            &secret,
        );
        match LicenseVerifier::new(secret.as_str()).verify_at(&token, fixed_now()) {
            Verdict::Invalid(invalid) => {
                prop_assert_eq!(invalid.kind, InvalidKind::Expired);
                prop_assert_eq!(invalid.customer_id, Some(customer));
                prop_assert_eq!(invalid.expires_at, Some(expires_at));
                prop_assert_eq!(invalid.features, Some(features));
            }
            Verdict::Valid(_) => prop_assert!(false, "past expiry verified"),
        }
    }

    #[test]
    fn missing_required_claim(
        secret in secret_strategy(),
        customer in customer_strategy(),
        drop_customer in any::<bool>(),
    ) {
        let claims = if drop_customer {
            json!({"expires_at": "2099-01-01T00:00:00Z"})
        } else {
            json!({"customer_id": customer})
        };
        let token = sign_token(&claims, &secret);
        let verdict = LicenseVerifier::new(secret.as_str()).verify_at(&token, fixed_now());
        prop_assert_eq!(verdict.kind(), Some(InvalidKind::MissingClaims));
    }
}

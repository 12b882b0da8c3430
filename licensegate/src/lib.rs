//! Offline verification of signed license tokens.
//!
//! This crate handles:
//! - HS256 signature verification of license tokens
//! - Required-claim enforcement (`customer_id`, `expires_at`)
//! - Expiration checks, both the token's own `exp` and the `expires_at` claim
//! - Feature-flag (entitlement) lookups
//!
//! # Design Principles
//!
//! - **Offline**: no licensing server is ever contacted
//! - **Total**: [`verify`] returns a [`Verdict`] for every input and never panics
//! - **Stateless**: each call is independent; nothing is cached
//!
//! # Token Format
//!
//! Tokens are compact JWS strings: `base64url(header).base64url(payload).base64url(signature)`
//! signed with HMAC-SHA256 over a shared secret. The payload is a JSON object
//! containing:
//! - `customer_id` and `expires_at` (required)
//! - `issued_at` and `features` (optional)

mod claims;
mod error;
mod secret;
mod token;
mod verdict;
mod verifier;

pub use claims::{parse_timestamp, LicenseClaims};
pub use error::{InvalidKind, LicenseError, LicenseResult};
pub use secret::{SecretKey, SECRET_ENV_VARS};
pub use token::{decode_hs256, TokenHeader, ALGORITHM};
pub use verdict::{InvalidLicense, ValidLicense, Verdict, VerdictReport};
pub use verifier::{verify, verify_file, LicenseVerifier};

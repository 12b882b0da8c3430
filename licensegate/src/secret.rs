//! The shared HMAC secret.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Environment variables consulted by [`SecretKey::from_env`], in order.
///
/// The issuing service signs with `JWT_SECRET`, falling back to
/// `LICENSE_SECRET_KEY`, so lookup follows the same order.
pub const SECRET_ENV_VARS: [&str; 2] = ["JWT_SECRET", "LICENSE_SECRET_KEY"];

/// Symmetric key used to verify HS256 license tokens.
///
/// The bytes are wiped on drop and never printed by `Debug`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: Vec<u8>,
}

impl SecretKey {
    /// Reads the secret from the environment (see [`SECRET_ENV_VARS`]).
    ///
    /// Empty variables are skipped.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves the secret through `lookup` using the same variable order as
    /// [`SecretKey::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        SECRET_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.is_empty())
            .map(Self::from)
    }

    /// Returns the raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns true if the key has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<String> for SecretKey {
    fn from(value: String) -> Self {
        Self {
            bytes: value.into_bytes(),
        }
    }
}

impl From<&str> for SecretKey {
    fn from(value: &str) -> Self {
        Self {
            bytes: value.as_bytes().to_vec(),
        }
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

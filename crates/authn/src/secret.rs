//! The symmetric signing secret.

use std::fmt;

use zeroize::Zeroizing;

use crate::error::AuthError;

/// Shared HMAC secret used to sign and verify credentials.
///
/// The bytes are scrubbed from memory on drop and never printed by `Debug`.
#[derive(Clone)]
pub struct SigningSecret(Zeroizing<Vec<u8>>);

impl SigningSecret {
    /// Wraps raw secret bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if `bytes` is empty.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, AuthError> {
        let bytes = Zeroizing::new(bytes.into());
        if bytes.is_empty() {
            return Err(AuthError::configuration("signing secret must not be empty"));
        }
        Ok(Self(bytes))
    }

    /// Borrows the secret bytes.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    /// Length of the secret in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; an empty secret cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningSecret").field("len", &self.0.len()).finish_non_exhaustive()
    }
}

impl TryFrom<&str> for SigningSecret {
    type Error = AuthError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.as_bytes())
    }
}

impl TryFrom<String> for SigningSecret {
    type Error = AuthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value.into_bytes())
    }
}

//! The credential authority: issuance and verification with a shared secret.
//!
//! # Example
//!
//! ```
//! use jobros_authn::{CredentialAuthority, SigningSecret};
//!
//! # fn example() -> Result<(), jobros_authn::AuthError> {
//! let authority = CredentialAuthority::from_secret(SigningSecret::try_from("change-me")?)?;
//!
//! let pair = authority.issue_credential_pair("user123", "admin")?;
//! assert!(authority.verify_credential(&pair.access));
//!
//! let claims = authority.extract_claims(&pair.refresh)?;
//! assert_eq!(claims.role, "admin");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use std::{fmt, sync::Arc, time::Duration};

use fail::fail_point;
use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::{
    clock::{Clock, SystemClock},
    config::AuthConfig,
    error::{AuthError, CredentialRejection, Result},
    jwt::{CredentialClaims, encode_claims, validate_claims, verify_signature},
    secret::SigningSecret,
};

/// Default access credential lifetime (15 minutes).
pub const ACCESS_CREDENTIAL_TTL: Duration = Duration::from_secs(15 * 60);

/// Default refresh credential lifetime (168 hours).
pub const REFRESH_CREDENTIAL_TTL: Duration = Duration::from_secs(168 * 60 * 60);

/// Which lifetime a credential is issued with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    /// Short-lived credential presented on every request.
    Access,
    /// Long-lived credential used to obtain new access credentials.
    Refresh,
}

impl CredentialKind {
    /// Lowercase name used in logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialKind::Access => "access",
            CredentialKind::Refresh => "refresh",
        }
    }
}

/// An access credential and a refresh credential for the same identity.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialPair {
    /// Short-lived credential.
    pub access: String,
    /// Long-lived credential.
    pub refresh: String,
}

impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair").finish_non_exhaustive()
    }
}

/// Issues and verifies signed credentials.
///
/// Immutable after construction and `Send + Sync`; share one instance behind
/// an `Arc` across all request handlers. Any authority built from the same
/// secret verifies credentials issued by any other.
pub struct CredentialAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    clock: Arc<dyn Clock>,
    access_ttl: chrono::Duration,
    refresh_ttl: chrono::Duration,
}

#[bon::bon]
impl CredentialAuthority {
    /// Creates an authority, validating the lifetimes.
    ///
    /// # Arguments
    ///
    /// * `secret` - The HMAC signing secret.
    ///
    /// # Optional Fields
    ///
    /// * `clock` - Time source (default: [`SystemClock`]).
    /// * `access_ttl` - Access credential lifetime (default: [`ACCESS_CREDENTIAL_TTL`]).
    /// * `refresh_ttl` - Refresh credential lifetime (default: [`REFRESH_CREDENTIAL_TTL`]).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if a lifetime is shorter than one
    /// second or too large to represent.
    #[builder]
    pub fn new(
        secret: SigningSecret,
        clock: Option<Arc<dyn Clock>>,
        #[builder(default = ACCESS_CREDENTIAL_TTL)] access_ttl: Duration,
        #[builder(default = REFRESH_CREDENTIAL_TTL)] refresh_ttl: Duration,
    ) -> Result<Self> {
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.expose()),
            decoding_key: DecodingKey::from_secret(secret.expose()),
            clock: clock.unwrap_or_else(|| Arc::new(SystemClock)),
            access_ttl: checked_lifetime("access_ttl", access_ttl)?,
            refresh_ttl: checked_lifetime("refresh_ttl", refresh_ttl)?,
        })
    }
}

impl CredentialAuthority {
    /// Creates an authority with default lifetimes and the system clock.
    ///
    /// # Errors
    ///
    /// See [`CredentialAuthority::builder`].
    pub fn from_secret(secret: SigningSecret) -> Result<Self> {
        Self::builder().secret(secret).build()
    }

    /// Creates an authority from resolved startup configuration.
    ///
    /// # Errors
    ///
    /// See [`CredentialAuthority::builder`].
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        Self::builder()
            .secret(config.secret.clone())
            .access_ttl(config.access_ttl)
            .refresh_ttl(config.refresh_ttl)
            .build()
    }

    /// Lifetime applied to credentials of `kind`.
    #[must_use]
    pub fn lifetime(&self, kind: CredentialKind) -> chrono::Duration {
        match kind {
            CredentialKind::Access => self.access_ttl,
            CredentialKind::Refresh => self.refresh_ttl,
        }
    }

    /// Issues a short-lived access credential.
    ///
    /// # Errors
    ///
    /// - [`AuthError::EmptyIdentity`] if `user_id` or `role` is empty
    /// - [`AuthError::Issuance`] if signing fails
    #[tracing::instrument(skip_all, fields(role = %role))]
    pub fn issue_access_credential(&self, user_id: &str, role: &str) -> Result<String> {
        self.issue(CredentialKind::Access, user_id, role)
    }

    /// Issues a long-lived refresh credential.
    ///
    /// # Errors
    ///
    /// - [`AuthError::EmptyIdentity`] if `user_id` or `role` is empty
    /// - [`AuthError::Issuance`] if signing fails
    #[tracing::instrument(skip_all, fields(role = %role))]
    pub fn issue_refresh_credential(&self, user_id: &str, role: &str) -> Result<String> {
        self.issue(CredentialKind::Refresh, user_id, role)
    }

    /// Issues an access credential, then a refresh credential.
    ///
    /// If the access credential cannot be issued, the refresh credential is
    /// not attempted.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered.
    #[tracing::instrument(skip_all, fields(role = %role))]
    pub fn issue_credential_pair(&self, user_id: &str, role: &str) -> Result<CredentialPair> {
        let access = self.issue(CredentialKind::Access, user_id, role)?;
        let refresh = self.issue(CredentialKind::Refresh, user_id, role)?;
        Ok(CredentialPair { access, refresh })
    }

    fn issue(&self, kind: CredentialKind, user_id: &str, role: &str) -> Result<String> {
        if user_id.is_empty() {
            return Err(AuthError::empty_identity("user_id"));
        }
        if role.is_empty() {
            return Err(AuthError::empty_identity("role"));
        }

        fail_point!("issue-access-credential", kind == CredentialKind::Access, |_| {
            Err(AuthError::issuance("fail point: issue-access-credential"))
        });
        fail_point!("issue-refresh-credential", kind == CredentialKind::Refresh, |_| {
            Err(AuthError::issuance("fail point: issue-refresh-credential"))
        });

        let issued_at = self.clock.now();
        let expires_at = issued_at
            .checked_add_signed(self.lifetime(kind))
            .ok_or_else(|| AuthError::issuance("credential expiry is out of range"))?;
        let claims = CredentialClaims::new(user_id, role, issued_at, expires_at);
        let token = encode_claims(&claims, &self.encoding_key)?;

        tracing::debug!(kind = kind.as_str(), exp = claims.exp, "Issued credential");

        Ok(token)
    }

    /// Returns `true` iff the credential is authentic, names a subject and
    /// role, and is inside its validity window right now.
    ///
    /// Never fails: malformed input, a foreign algorithm, a bad signature,
    /// missing identity, expiry, and premature use all yield `false`.
    #[must_use]
    pub fn verify_credential(&self, token: &str) -> bool {
        match self.check(token) {
            Ok(_) => true,
            Err(reason) => {
                tracing::debug!(%reason, "Credential rejected");
                false
            },
        }
    }

    fn check(&self, token: &str) -> std::result::Result<CredentialClaims, CredentialRejection> {
        let claims = verify_signature(token, &self.decoding_key)?;
        validate_claims(&claims, self.clock.now_secs())?;
        Ok(claims)
    }

    /// Returns the claims of an authentic credential without checking its
    /// validity window.
    ///
    /// This is inspection, not authorization: an expired credential still
    /// yields its claims. Pair with [`verify_credential`](Self::verify_credential)
    /// when access decisions depend on the result.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredential`] if the credential is malformed,
    /// declares a non-HMAC algorithm, or fails signature verification.
    pub fn extract_claims(&self, token: &str) -> Result<CredentialClaims> {
        verify_signature(token, &self.decoding_key).map_err(AuthError::invalid_credential)
    }
}

impl fmt::Debug for CredentialAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialAuthority")
            .field("clock", &self.clock)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

fn checked_lifetime(name: &str, ttl: Duration) -> Result<chrono::Duration> {
    if ttl < Duration::from_secs(1) {
        return Err(AuthError::configuration(format!("{name} must be at least one second")));
    }
    chrono::Duration::from_std(ttl).map_err(|e| {
        AuthError::configuration_with_source(format!("{name} is out of range"), e)
    })
}

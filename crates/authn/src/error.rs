//! Authentication error types.
//!
//! This module defines the errors surfaced by credential issuance, claim
//! extraction, and authority construction.
//!
//! Verification has no error type of its own: every failure is
//! collapsed into `false` by
//! [`CredentialAuthority::verify_credential`](crate::CredentialAuthority::verify_credential).
//! The cause is still computed internally as a [`CredentialRejection`] and
//! logged at `debug` level.

use std::{fmt, sync::Arc};

use thiserror::Error;

/// A boxed error type for source chain tracking.
pub type BoxError = Arc<dyn std::error::Error + Send + Sync>;

/// Why a presented credential was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CredentialRejection {
    /// The string is not a well-formed compact signed token.
    Malformed(String),
    /// The header declares an algorithm outside the accepted HMAC family.
    UnsupportedAlgorithm(String),
    /// The signature does not match the signing secret.
    InvalidSignature,
    /// A required claim is absent or empty.
    MissingClaim(&'static str),
    /// `exp` is not strictly after the current time.
    Expired,
    /// `nbf` is after the current time.
    NotYetValid,
    /// `iat` is after the current time.
    IssuedInFuture,
}

impl fmt::Display for CredentialRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(detail) => write!(f, "malformed credential: {detail}"),
            Self::UnsupportedAlgorithm(alg) => write!(f, "unsupported algorithm: {alg}"),
            Self::InvalidSignature => f.write_str("invalid signature"),
            Self::MissingClaim(claim) => write!(f, "missing claim: {claim}"),
            Self::Expired => f.write_str("credential expired"),
            Self::NotYetValid => f.write_str("credential not yet valid"),
            Self::IssuedInFuture => f.write_str("credential issued in the future"),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for CredentialRejection {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                Self::UnsupportedAlgorithm("algorithm not accepted".into())
            },
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::ImmatureSignature => Self::NotYetValid,
            ErrorKind::MissingRequiredClaim(claim) => Self::Malformed(format!("missing {claim}")),
            // serde messages quote the offending claim value
            ErrorKind::Json(_) | ErrorKind::Utf8(_) => Self::Malformed("invalid claims".into()),
            ErrorKind::Base64(_) => Self::Malformed("invalid base64url segment".into()),
            _ => Self::Malformed("undecodable credential".into()),
        }
    }
}

/// Authentication errors.
///
/// # Non-exhaustive
///
/// This enum is marked `#[non_exhaustive]`: new variants may be added in
/// future minor releases without a semver-breaking change. Downstream match
/// expressions must include a wildcard arm (`_ =>`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    /// The signing secret or credential lifetimes are missing or invalid.
    ///
    /// Raised only during startup; callers are expected to abort.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
        /// The underlying error, e.g. a YAML or I/O failure.
        #[source]
        source: Option<BoxError>,
    },

    /// Signing a credential failed.
    #[error("Issuance failed: {message}")]
    Issuance {
        /// Description of the signing failure.
        message: String,
        /// The underlying encoder error.
        #[source]
        source: Option<BoxError>,
    },

    /// Issuance was asked to bind an empty subject or role.
    #[error("Cannot issue credential with empty {field}")]
    EmptyIdentity {
        /// Name of the empty claim (`user_id` or `role`).
        field: &'static str,
    },

    /// The credential failed parsing, algorithm, or signature checks.
    #[error("Invalid credential: {reason}")]
    InvalidCredential {
        /// The specific cause.
        reason: CredentialRejection,
    },
}

impl AuthError {
    /// Creates a new `Configuration` error with the given message.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into(), source: None }
    }

    /// Creates a new `Configuration` error with a message and source error.
    #[must_use]
    pub fn configuration_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Configuration { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Issuance` error with the given message.
    #[must_use]
    pub fn issuance(message: impl Into<String>) -> Self {
        Self::Issuance { message: message.into(), source: None }
    }

    /// Creates a new `Issuance` error with a message and source error.
    #[must_use]
    pub fn issuance_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Issuance { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `EmptyIdentity` error for the named claim.
    #[must_use]
    pub fn empty_identity(field: &'static str) -> Self {
        Self::EmptyIdentity { field }
    }

    /// Creates a new `InvalidCredential` error.
    #[must_use]
    pub fn invalid_credential(reason: CredentialRejection) -> Self {
        Self::InvalidCredential { reason }
    }

    /// Returns the rejection cause if this is an `InvalidCredential` error.
    #[must_use]
    pub fn rejection(&self) -> Option<&CredentialRejection> {
        match self {
            Self::InvalidCredential { reason } => Some(reason),
            _ => None,
        }
    }
}

impl From<CredentialRejection> for AuthError {
    fn from(reason: CredentialRejection) -> Self {
        Self::InvalidCredential { reason }
    }
}

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::configuration("JWT_SECRET_KEY is not set");
        assert_eq!(err.to_string(), "Configuration error: JWT_SECRET_KEY is not set");

        let err = AuthError::empty_identity("role");
        assert_eq!(err.to_string(), "Cannot issue credential with empty role");

        let err = AuthError::invalid_credential(CredentialRejection::InvalidSignature);
        assert_eq!(err.to_string(), "Invalid credential: invalid signature");

        let err = AuthError::invalid_credential(CredentialRejection::MissingClaim("user_id"));
        assert_eq!(err.to_string(), "Invalid credential: missing claim: user_id");
    }

    #[test]
    fn test_rejection_from_jsonwebtoken() {
        use jsonwebtoken::errors::{Error, ErrorKind};

        let rejection: CredentialRejection = Error::from(ErrorKind::InvalidSignature).into();
        assert_eq!(rejection, CredentialRejection::InvalidSignature);

        let rejection: CredentialRejection = Error::from(ErrorKind::InvalidAlgorithm).into();
        assert!(matches!(rejection, CredentialRejection::UnsupportedAlgorithm(_)));

        let rejection: CredentialRejection = Error::from(ErrorKind::InvalidToken).into();
        assert!(matches!(rejection, CredentialRejection::Malformed(_)));
    }

    #[test]
    fn test_claim_decode_errors_do_not_echo_values() {
        use jsonwebtoken::errors::{Error, ErrorKind};

        let serde_err = serde_json::from_str::<i64>(r#""secret-claim-value""#).unwrap_err();
        assert!(serde_err.to_string().contains("secret-claim-value"));

        let rejection: CredentialRejection =
            Error::from(ErrorKind::Json(Arc::new(serde_err))).into();
        assert_eq!(rejection, CredentialRejection::Malformed("invalid claims".into()));
        assert!(!rejection.to_string().contains("secret-claim-value"));
    }

    #[test]
    fn test_rejection_accessor() {
        let err: AuthError = CredentialRejection::Expired.into();
        assert_eq!(err.rejection(), Some(&CredentialRejection::Expired));
        assert!(AuthError::issuance("boom").rejection().is_none());
    }

    #[test]
    fn test_issuance_error_preserves_source_chain() {
        use std::error::Error as _;

        let inner = jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::InvalidKeyFormat,
        );
        let err = AuthError::issuance_with_source("failed to sign access credential", inner);

        let source = err.source().expect("source chain must be preserved");
        assert!(!source.to_string().is_empty());
    }

    #[test]
    fn test_configuration_without_source() {
        use std::error::Error as _;

        let err = AuthError::configuration("empty secret");
        assert!(err.source().is_none());
    }
}

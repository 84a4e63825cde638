//! Credential claims and compact token encoding.
//!
//! A credential is a compact JWS: three dot-separated base64url segments
//! holding the header, the claims, and an HMAC signature.
//!
//! ```json
//! { "alg": "HS256", "typ": "JWT" }
//! {
//!   "user_id": "user123",
//!   "role": "admin",
//!   "exp": 1700000900,
//!   "iat": 1700000000,
//!   "nbf": 1700000000
//! }
//! ```
//!
//! The functions here are the building blocks of
//! [`CredentialAuthority`](crate::CredentialAuthority); they never consult a
//! clock themselves; `now` is always passed in.

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, decode_header};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AuthError, CredentialRejection},
    validation::{ISSUED_ALGORITHM, validate_algorithm},
};

/// Claims carried by every credential.
///
/// `user_id` and `role` default to empty when absent so that a structurally
/// valid token missing them is reported as [`CredentialRejection::MissingClaim`]
/// rather than as a parse failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialClaims {
    /// Identifier of the authenticated principal.
    #[serde(default)]
    pub user_id: String,
    /// Coarse-grained authorization tag.
    #[serde(default)]
    pub role: String,
    /// Expiration time (seconds since epoch).
    pub exp: i64,
    /// Issued at (optional, seconds since epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Not before (optional, seconds since epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
}

impl CredentialClaims {
    /// Builds claims valid from `issued_at` until `expires_at`, with `nbf = iat`.
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        role: impl Into<String>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let iat = issued_at.timestamp();
        Self {
            user_id: user_id.into(),
            role: role.into(),
            exp: expires_at.timestamp(),
            iat: Some(iat),
            nbf: Some(iat),
        }
    }

    /// Expiration as a UTC timestamp.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Issue time as a UTC timestamp, if present.
    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|iat| DateTime::from_timestamp(iat, 0))
    }

    /// Not-before time as a UTC timestamp, if present.
    #[must_use]
    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.nbf.and_then(|nbf| DateTime::from_timestamp(nbf, 0))
    }
}

/// Decode the credential header without verification.
///
/// # Errors
///
/// Returns [`CredentialRejection::Malformed`] if the header segment is not valid
/// base64url JSON or names an algorithm `jsonwebtoken` does not know (including `none`).
pub fn decode_credential_header(token: &str) -> Result<Header, CredentialRejection> {
    decode_header(token)
        .map_err(|_| CredentialRejection::Malformed("failed to decode credential header".into()))
}

/// Verify the credential's algorithm and signature and return its claims.
///
/// Time-window claims are *not* checked here; see [`validate_claims`].
///
/// # Errors
///
/// Returns a [`CredentialRejection`] if:
/// - the token is not a three-segment compact JWS
/// - the declared algorithm is outside the HMAC family
/// - the signature does not verify against `key`
/// - the claims segment is not valid JSON or lacks `exp`
pub fn verify_signature(
    token: &str,
    key: &DecodingKey,
) -> Result<CredentialClaims, CredentialRejection> {
    let header = decode_credential_header(token)?;
    validate_algorithm(header.alg)?;

    let mut validation = Validation::new(header.alg);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<CredentialClaims>(token, key, &validation)?;

    Ok(token_data.claims)
}

/// Validate identity and time-window claims against `now` (seconds since epoch).
///
/// # Errors
///
/// Returns an error if:
/// - `user_id` or `role` is empty
/// - `exp` is not strictly after `now`
/// - `iat` is present and after `now`
/// - `nbf` is present and after `now`
pub fn validate_claims(claims: &CredentialClaims, now: i64) -> Result<(), CredentialRejection> {
    if claims.user_id.is_empty() {
        return Err(CredentialRejection::MissingClaim("user_id"));
    }
    if claims.role.is_empty() {
        return Err(CredentialRejection::MissingClaim("role"));
    }

    if claims.exp <= now {
        return Err(CredentialRejection::Expired);
    }

    if let Some(iat) = claims.iat
        && iat > now
    {
        return Err(CredentialRejection::IssuedInFuture);
    }

    if let Some(nbf) = claims.nbf
        && nbf > now
    {
        return Err(CredentialRejection::NotYetValid);
    }

    Ok(())
}

/// Sign claims with [`ISSUED_ALGORITHM`].
///
/// # Errors
///
/// Returns [`AuthError::Issuance`] if serialization or signing fails.
pub fn encode_claims(claims: &CredentialClaims, key: &EncodingKey) -> Result<String, AuthError> {
    let header = Header::new(ISSUED_ALGORITHM);
    jsonwebtoken::encode(&header, claims, key)
        .map_err(|e| AuthError::issuance_with_source("failed to sign credential", e))
}

//! Credential algorithm validation.
//!
//! Credentials are signed with a shared symmetric secret, so only the HMAC
//! family is ever acceptable. Any other declared algorithm is rejected before
//! the secret is used, which closes the algorithm substitution hole where a
//! token claims an asymmetric scheme (or none at all) to bypass the HMAC check.
//!
//! `alg: "none"` never reaches this module: it is not a recognized
//! [`Algorithm`] variant, so header parsing already fails.

use jsonwebtoken::Algorithm;

use crate::error::CredentialRejection;

/// The algorithm every issued credential is signed with.
pub const ISSUED_ALGORITHM: Algorithm = Algorithm::HS256;

/// Algorithms accepted when verifying a presented credential.
pub const ACCEPTED_ALGORITHMS: &[Algorithm] =
    &[Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Validate a declared credential algorithm against the HMAC-only policy.
///
/// # Errors
///
/// Returns [`CredentialRejection::UnsupportedAlgorithm`] for any algorithm not in
/// [`ACCEPTED_ALGORITHMS`].
///
/// # Examples
///
/// ```
/// use jobros_authn::validation::validate_algorithm;
/// use jsonwebtoken::Algorithm;
///
/// assert!(validate_algorithm(Algorithm::HS256).is_ok());
/// assert!(validate_algorithm(Algorithm::RS256).is_err());
/// assert!(validate_algorithm(Algorithm::EdDSA).is_err());
/// ```
pub fn validate_algorithm(alg: Algorithm) -> Result<(), CredentialRejection> {
    if ACCEPTED_ALGORITHMS.contains(&alg) {
        Ok(())
    } else {
        Err(CredentialRejection::UnsupportedAlgorithm(format!(
            "Algorithm '{alg:?}' is not allowed; only HMAC credentials are accepted"
        )))
    }
}

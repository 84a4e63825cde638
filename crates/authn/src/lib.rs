//! # Jobros Authentication
//!
//! Signed session credentials for Jobros services.
//!
//! This crate provides:
//! - **Credential authority**: issues access and refresh credentials for a
//!   `(user_id, role)` identity, verifies them, and extracts their claims
//! - **Algorithm policy**: only the HMAC family is accepted; anything else is
//!   rejected before signature verification
//! - **Startup configuration**: signing secret and lifetimes from a YAML file
//!   with environment overrides
//!
//! ## Example
//!
//! ```
//! use jobros_authn::{AuthConfig, CredentialAuthority, SigningSecret};
//!
//! # fn example() -> Result<(), jobros_authn::AuthError> {
//! let config = AuthConfig::builder().secret(SigningSecret::try_from("change-me")?).build();
//! let authority = CredentialAuthority::from_config(&config)?;
//!
//! let access = authority.issue_access_credential("user123", "admin")?;
//! assert!(authority.verify_credential(&access));
//! assert_eq!(authority.extract_claims(&access)?.user_id, "user123");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Credential issuance and verification.
pub mod authority;
/// Time source abstraction.
pub mod clock;
/// Startup configuration.
pub mod config;
/// Authentication error types.
pub mod error;
/// Credential claims and the signing primitives beneath the authority.
pub mod jwt;
/// The symmetric signing secret.
pub mod secret;
/// Algorithm validation.
pub mod validation;

/// Test helpers: manual clock, token crafting, assertion macros.
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used)]
pub mod testutil;

pub use authority::{
    ACCESS_CREDENTIAL_TTL, CredentialAuthority, CredentialKind, CredentialPair,
    REFRESH_CREDENTIAL_TTL,
};
pub use clock::{Clock, SystemClock};
pub use config::AuthConfig;
pub use error::{AuthError, CredentialRejection, Result};
pub use jwt::CredentialClaims;
pub use secret::SigningSecret;
pub use validation::{ACCEPTED_ALGORITHMS, validate_algorithm};

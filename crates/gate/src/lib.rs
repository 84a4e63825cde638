//! # Jobros Request Gate
//!
//! Bearer credential enforcement for axum routers.
//!
//! Each request is handled in one of four ways:
//!
//! | request | response |
//! |---|---|
//! | no `Authorization` header | `401 {"error": "Authorization header is required"}` |
//! | not `Bearer <credential>` | `401 {"error": "Invalid authorization header format"}` |
//! | credential fails verification | `401 {"error": "Invalid token"}` |
//! | valid credential | passed to the handler unchanged |
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use axum::{Router, routing::get};
//! use jobros_authn::{AuthConfig, CredentialAuthority};
//! use jobros_gate::{AuthenticatedPrincipal, CredentialGate, protect};
//!
//! # fn example() -> Result<(), jobros_authn::AuthError> {
//! let authority = Arc::new(CredentialAuthority::from_config(&AuthConfig::from_env()?)?);
//! let gate = CredentialGate::new(authority).propagating_identity();
//!
//! let app: Router = protect(
//!     Router::new().route(
//!         "/jobs",
//!         get(|principal: AuthenticatedPrincipal| async move { principal.user_id }),
//!     ),
//!     gate,
//! )
//! .route("/health", get(|| async { "ok" }));
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// `Authorization` header parsing.
pub mod bearer;
/// Gate middleware and its state.
pub mod middleware;
/// Identity propagated to handlers.
pub mod principal;
/// Rejection responses.
pub mod rejection;

pub use bearer::{BEARER_SCHEME, bearer_credential};
pub use middleware::{CredentialGate, protect, require_bearer};
pub use principal::AuthenticatedPrincipal;
pub use rejection::{ErrorResponse, GateRejection};

//! Identity handed to downstream handlers.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{DateTime, Utc};
use jobros_authn::CredentialClaims;

use crate::rejection::GateRejection;

/// The verified identity behind a request.
///
/// Inserted into request extensions by a gate built with
/// [`CredentialGate::propagating_identity`](crate::CredentialGate::propagating_identity).
/// Handlers take it as an extractor; if the gate did not run or does not
/// propagate identity, extraction fails with [`GateRejection::InvalidCredential`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    /// Subject the credential was issued to.
    pub user_id: String,
    /// Role carried by the credential.
    pub role: String,
    /// When the presented credential stops being accepted.
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<CredentialClaims> for AuthenticatedPrincipal {
    fn from(claims: CredentialClaims) -> Self {
        let expires_at = claims.expires_at();
        Self { user_id: claims.user_id, role: claims.role, expires_at }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedPrincipal
where
    S: Send + Sync,
{
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or(GateRejection::InvalidCredential)
    }
}

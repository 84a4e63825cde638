//! The gate as axum middleware.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    http::HeaderMap,
    middleware::{Next, from_fn_with_state},
    response::{IntoResponse, Response},
};
use jobros_authn::CredentialAuthority;

use crate::{bearer::bearer_credential, principal::AuthenticatedPrincipal, rejection::GateRejection};

/// Guards routes behind a bearer credential.
///
/// Cheap to clone; every clone shares the same authority. The gate is
/// stateless per request: it either rejects or passes the request through
/// untouched.
#[derive(Debug, Clone)]
pub struct CredentialGate {
    authority: Arc<CredentialAuthority>,
    propagate_identity: bool,
}

impl CredentialGate {
    /// Creates a gate that verifies credentials with `authority`.
    #[must_use]
    pub fn new(authority: Arc<CredentialAuthority>) -> Self {
        Self { authority, propagate_identity: false }
    }

    /// Also inserts an [`AuthenticatedPrincipal`] into the request extensions
    /// of every admitted request.
    #[must_use]
    pub fn propagating_identity(mut self) -> Self {
        self.propagate_identity = true;
        self
    }

    /// The authority this gate verifies against.
    #[must_use]
    pub fn authority(&self) -> &CredentialAuthority {
        &self.authority
    }

    /// Decides whether a request carrying `headers` may proceed.
    ///
    /// Returns the principal when identity propagation is enabled, `None`
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns the [`GateRejection`] that terminates the request.
    pub fn authorize(
        &self,
        headers: &HeaderMap,
    ) -> Result<Option<AuthenticatedPrincipal>, GateRejection> {
        let credential = bearer_credential(headers)?;

        if !self.authority.verify_credential(credential) {
            return Err(GateRejection::InvalidCredential);
        }
        if !self.propagate_identity {
            return Ok(None);
        }

        let claims = self
            .authority
            .extract_claims(credential)
            .map_err(|_| GateRejection::InvalidCredential)?;
        Ok(Some(AuthenticatedPrincipal::from(claims)))
    }
}

/// Middleware function rejecting requests without a valid bearer credential.
///
/// Install with [`axum::middleware::from_fn_with_state`], or use [`protect`].
pub async fn require_bearer(
    State(gate): State<CredentialGate>,
    mut request: Request,
    next: Next,
) -> Response {
    match gate.authorize(request.headers()) {
        Ok(principal) => {
            if let Some(principal) = principal {
                request.extensions_mut().insert(principal);
            }
            next.run(request).await
        },
        Err(rejection) => {
            tracing::debug!(
                rejection = rejection.kind(),
                method = %request.method(),
                path = request.uri().path(),
                "Request rejected"
            );
            rejection.into_response()
        },
    }
}

/// Puts every route already registered on `router` behind `gate`.
///
/// Routes added after this call are not protected, and unmatched paths still
/// produce `404` rather than `401`.
///
/// # Panics
///
/// Panics if `router` has no routes yet, as [`Router::route_layer`] does.
pub fn protect<S>(router: Router<S>, gate: CredentialGate) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(from_fn_with_state(gate, require_bearer))
}

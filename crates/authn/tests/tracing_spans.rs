//! Integration test verifying that `#[instrument]` annotations produce the
//! expected spans on credential operations, and that neither credentials nor
//! identities leak into recorded fields.

#![allow(clippy::expect_used)]

use std::sync::{Arc, Mutex};

use jobros_authn::{CredentialAuthority, SigningSecret, testutil::sign_claims};
use jsonwebtoken::Algorithm;
use tracing::{
    Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{layer::SubscriberExt, registry::LookupSpan};

// ---------------------------------------------------------------------------
// Collecting layer: records span names and every formatted field value
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct SpanCollector {
    spans: Arc<Mutex<Vec<String>>>,
    fields: Arc<Mutex<Vec<String>>>,
}

struct FieldRecorder<'a>(&'a mut Vec<String>);

impl Visit for FieldRecorder<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.push(format!("{}={value:?}", field.name()));
    }
}

impl<S> tracing_subscriber::Layer<S> for SpanCollector
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        if let Some(span) = ctx.span(id) {
            self.spans.lock().expect("lock poisoned").push(span.name().to_owned());
        }
        attrs.record(&mut FieldRecorder(&mut self.fields.lock().expect("lock poisoned")));
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        event.record(&mut FieldRecorder(&mut self.fields.lock().expect("lock poisoned")));
    }
}

fn authority() -> CredentialAuthority {
    CredentialAuthority::from_secret(SigningSecret::try_from("span-secret").expect("secret"))
        .expect("valid authority")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn issue_access_credential_creates_span() {
    let collector = SpanCollector::default();
    let spans = Arc::clone(&collector.spans);

    let subscriber = tracing_subscriber::registry().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    authority().issue_access_credential("user123", "admin").expect("issue should succeed");

    let recorded = spans.lock().expect("lock poisoned");
    assert!(
        recorded.iter().any(|s| s == "issue_access_credential"),
        "expected an 'issue_access_credential' span, got: {recorded:?}"
    );
}

#[test]
fn issue_refresh_credential_creates_span() {
    let collector = SpanCollector::default();
    let spans = Arc::clone(&collector.spans);

    let subscriber = tracing_subscriber::registry().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    authority().issue_refresh_credential("user123", "admin").expect("issue should succeed");

    let recorded = spans.lock().expect("lock poisoned");
    assert!(
        recorded.iter().any(|s| s == "issue_refresh_credential"),
        "expected an 'issue_refresh_credential' span, got: {recorded:?}"
    );
}

#[test]
fn issue_credential_pair_creates_span() {
    let collector = SpanCollector::default();
    let spans = Arc::clone(&collector.spans);

    let subscriber = tracing_subscriber::registry().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    authority().issue_credential_pair("user123", "admin").expect("issue should succeed");

    let recorded = spans.lock().expect("lock poisoned");
    assert!(
        recorded.iter().any(|s| s == "issue_credential_pair"),
        "expected an 'issue_credential_pair' span, got: {recorded:?}"
    );
}

#[test]
fn credentials_and_user_ids_never_recorded() {
    let collector = SpanCollector::default();
    let fields = Arc::clone(&collector.fields);

    let subscriber = tracing_subscriber::registry().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    let authority = authority();
    let pair = authority.issue_credential_pair("user-sensitive-id", "admin").expect("pair");
    assert!(authority.verify_credential(&pair.access));
    assert!(!authority.verify_credential("not-a-credential"));
    let tampered = format!("{}x", pair.refresh);
    assert!(!authority.verify_credential(&tampered));

    let recorded = fields.lock().expect("lock poisoned");
    assert!(!recorded.is_empty(), "expected issuance and rejection events to be recorded");
    for field in recorded.iter() {
        assert!(!field.contains(&pair.access), "access credential leaked: {field}");
        assert!(!field.contains(&pair.refresh), "refresh credential leaked: {field}");
        assert!(!field.contains("not-a-credential"), "presented token leaked: {field}");
        assert!(!field.contains("user-sensitive-id"), "user id leaked: {field}");
        assert!(!field.contains("span-secret"), "secret leaked: {field}");
    }
}

#[test]
fn claim_values_of_rejected_credentials_never_recorded() {
    let collector = SpanCollector::default();
    let fields = Arc::clone(&collector.fields);

    let subscriber = tracing_subscriber::registry().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    // Authentic signature, but `exp` has the wrong type, so decoding fails
    // inside serde with an error that quotes the value.
    let token = sign_claims(
        &serde_json::json!({"user_id": "user-sensitive-id", "role": "admin", "exp": "exp-sensitive-value"}),
        b"span-secret",
        Algorithm::HS256,
    );
    assert!(!authority().verify_credential(&token));

    let recorded = fields.lock().expect("lock poisoned");
    assert!(!recorded.is_empty(), "expected the rejection event to be recorded");
    for field in recorded.iter() {
        assert!(!field.contains("exp-sensitive-value"), "claim value leaked: {field}");
        assert!(!field.contains("user-sensitive-id"), "user id leaked: {field}");
    }
}

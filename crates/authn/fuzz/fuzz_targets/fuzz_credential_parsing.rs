//! Fuzz target for credential parsing and verification.
//!
//! Feeds arbitrary byte strings as credentials to the authority. Every
//! result must be `true`/`false` from verification and `Ok`/`Err` from
//! extraction; nothing may panic.

#![no_main]

use std::sync::LazyLock;

use jobros_authn::{CredentialAuthority, SigningSecret, jwt::decode_credential_header};
use libfuzzer_sys::fuzz_target;

static AUTHORITY: LazyLock<Option<CredentialAuthority>> = LazyLock::new(|| {
    SigningSecret::try_from("fuzz-secret")
        .and_then(CredentialAuthority::from_secret)
        .ok()
});

fuzz_target!(|data: &[u8]| {
    // Credentials are always UTF-8 strings.
    let Ok(token) = std::str::from_utf8(data) else {
        return;
    };
    let Some(authority) = AUTHORITY.as_ref() else {
        return;
    };

    let _ = decode_credential_header(token);

    let verified = authority.verify_credential(token);
    let extracted = authority.extract_claims(token);

    // Verification implies the signature checked out.
    if verified {
        assert!(extracted.is_ok(), "verified credential must yield claims");
    }
});

//! Fuzz target for claim validation.
//!
//! Signs arbitrary JSON payloads with the fuzz secret so that inputs reach
//! claim deserialization and time-window validation instead of stopping at
//! the signature check.

#![no_main]

use jobros_authn::jwt::{validate_claims, verify_signature};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};
use libfuzzer_sys::fuzz_target;

const SECRET: &[u8] = b"fuzz-secret";

fuzz_target!(|data: &[u8]| {
    let Ok(payload) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let Ok(token) = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &payload,
        &EncodingKey::from_secret(SECRET),
    ) else {
        return;
    };

    if let Ok(claims) = verify_signature(&token, &DecodingKey::from_secret(SECRET)) {
        for now in [i64::MIN, -1, 0, 1_700_000_000, i64::MAX] {
            let _ = validate_claims(&claims, now);
        }
        let _ = claims.expires_at();
        let _ = claims.issued_at();
        let _ = claims.not_before();
    }
});

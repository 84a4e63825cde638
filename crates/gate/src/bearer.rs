//! `Authorization` header parsing.

use axum::http::{HeaderMap, header::AUTHORIZATION};

use crate::rejection::GateRejection;

/// The only accepted authorization scheme. Matched case-sensitively.
pub const BEARER_SCHEME: &str = "Bearer";

/// Extracts the bearer credential from `headers`.
///
/// The header value is split on single spaces and must yield exactly two
/// parts, the first being [`BEARER_SCHEME`]. The credential itself is not
/// inspected here, so `"Bearer "` yields an empty credential that later fails
/// verification, while `"Bearer  token"` (two spaces) is malformed.
///
/// # Errors
///
/// - [`GateRejection::MissingHeader`] if the header is absent or empty
/// - [`GateRejection::MalformedHeader`] if the value is not valid visible
///   ASCII or not of the form `Bearer <credential>`
pub fn bearer_credential(headers: &HeaderMap) -> Result<&str, GateRejection> {
    let value = match headers.get(AUTHORIZATION) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(GateRejection::MissingHeader),
    };
    let value = value.to_str().map_err(|_| GateRejection::MalformedHeader)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(credential), None) => Ok(credential),
        _ => Err(GateRejection::MalformedHeader),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use axum::http::HeaderValue;
    use proptest::prelude::*;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).expect("valid header"));
        headers
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(bearer_credential(&HeaderMap::new()), Err(GateRejection::MissingHeader));
    }

    #[test]
    fn test_empty_header() {
        assert_eq!(bearer_credential(&headers("")), Err(GateRejection::MissingHeader));
    }

    #[test]
    fn test_bearer_credential_extracted() {
        assert_eq!(bearer_credential(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_malformed_values() {
        for value in [
            "InvalidFormat",
            "Bearer",
            "bearer abc",
            "BEARER abc",
            "Basic dXNlcjpwYXNz",
            "Bearer a b",
            "Bearer  abc",
            " Bearer abc",
        ] {
            assert_eq!(
                bearer_credential(&headers(value)),
                Err(GateRejection::MalformedHeader),
                "{value:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_trailing_space_yields_empty_credential() {
        assert_eq!(bearer_credential(&headers("Bearer ")), Ok(""));
    }

    #[test]
    fn test_non_ascii_value_is_malformed() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap());
        assert_eq!(bearer_credential(&headers), Err(GateRejection::MalformedHeader));
    }

    #[test]
    fn test_first_header_wins() {
        let mut headers = headers("Bearer first");
        headers.append(AUTHORIZATION, HeaderValue::from_static("Bearer second"));
        assert_eq!(bearer_credential(&headers), Ok("first"));
    }

    proptest! {
        /// Any space-free credential survives extraction unchanged.
        #[test]
        fn space_free_credentials_round_trip(credential in "[A-Za-z0-9._~+/=-]{0,256}") {
            let map = headers(&format!("Bearer {credential}"));
            prop_assert_eq!(bearer_credential(&map), Ok(credential.as_str()));
        }
    }
}

//! `username` session cookie helpers.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};

pub const SESSION_COOKIE_NAME: &str = "username";

/// Build the session cookie. No `Max-Age`, so it lives for the browser session.
pub(crate) fn session_cookie(token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!("{SESSION_COOKIE_NAME}={token}; Path=/"))
}

pub(crate) fn clear_session_cookie() -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!("{SESSION_COOKIE_NAME}=; Path=/; Max-Age=0"))
}

/// Pull the session token out of the `Cookie` header.
///
/// Empty values count as no cookie.
pub(crate) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let Some((key, val)) = pair.trim().split_once('=') else {
                continue;
            };
            if key.trim() == SESSION_COOKIE_NAME {
                let val = val.trim().trim_matches('"');
                return (!val.is_empty()).then(|| val.to_string());
            }
        }
    }
    None
}

//! Cart token generation and cookie handling.
//!
//! The cart token is the only session state the service keeps: it identifies
//! the shopper's in-progress order and travels in the `cart_token` cookie.

use axum::http::{HeaderMap, HeaderValue, header};
use base64::Engine as _;
use serde_json::json;

use crate::error::AppError;

/// Name of the cookie carrying the cart token.
pub const CART_COOKIE: &str = "cart_token";

/// Length of random bytes before base64 encoding.
const TOKEN_LENGTH_BYTES: usize = 24;

/// Generates a random cart token.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, producing a 32-character token.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
pub fn generate_token() -> Result<String, AppError> {
    let mut buffer = [0u8; TOKEN_LENGTH_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate cart token",
            json!({"reason": e.to_string()}),
        )
    })?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Returns true if the value has the shape of a token produced by [`generate_token`].
pub fn is_well_formed(token: &str) -> bool {
    token.len() == 32
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Extracts the cart token from the `Cookie` header.
///
/// Handles multiple cookies in one header. Malformed tokens are ignored, so a
/// tampered cookie behaves like a missing one.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(CART_COOKIE), Some(value)) if is_well_formed(value) => {
                    Some(value.to_string())
                }
                _ => None,
            }
        })
}

/// Builds the `Set-Cookie` header value for a cart token.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the token contains characters not valid
/// in a header value.
pub fn set_cookie_header(token: &str, secure: bool) -> Result<HeaderValue, AppError> {
    let mut cookie = format!("{CART_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }

    HeaderValue::from_str(&cookie)
        .map_err(|_| AppError::internal("Invalid cart token", json!({})))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_shape() {
        let token = generate_token().unwrap();
        assert_eq!(token.len(), 32);
        assert!(is_well_formed(&token));
    }

    #[test]
    fn test_generate_token_uniqueness() {
        let a = generate_token().unwrap();
        let b = generate_token().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_from_headers_among_other_cookies() {
        let token = generate_token().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {CART_COOKIE}={token}; lang=en")).unwrap(),
        );

        assert_eq!(token_from_headers(&headers), Some(token));
    }

    #[test]
    fn test_token_from_headers_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));

        assert_eq!(token_from_headers(&headers), None);
        assert_eq!(token_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn test_token_from_headers_rejects_malformed() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("cart_token=../../etc/passwd"),
        );

        assert_eq!(token_from_headers(&headers), None);
    }

    #[test]
    fn test_set_cookie_header() {
        let value = set_cookie_header("abc", false).unwrap();
        let s = value.to_str().unwrap();
        assert!(s.starts_with("cart_token=abc;"));
        assert!(s.contains("HttpOnly"));
        assert!(!s.contains("Secure"));

        let secure = set_cookie_header("abc", true).unwrap();
        assert!(secure.to_str().unwrap().ends_with("; Secure"));
    }
}

//! Session-cookie authentication middleware
//!
//! The dashboard carries an opaque session token in an HTTP-only cookie.
//! The middleware resolves it through the session store and inserts the
//! owning merchant id into request extensions; expiry and absence both
//! produce a 401 with a cookie-clearing header.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::error::{AppError, ErrorCode};

use crate::state::AppState;

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "terminal_session";

const COOKIE_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;

/// Authenticated merchant, inserted into request extensions
#[derive(Clone)]
pub struct AuthedMerchant {
    pub merchant_id: String,
}

/// Require a valid session cookie.
pub async fn session_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let Some(token) = cookie_value(request.headers(), SESSION_COOKIE) else {
        return Err(AppError::new(ErrorCode::NotAuthenticated).into_response());
    };

    match state.sessions.validate(&token).await {
        Some(merchant_id) => {
            let _ = request
                .extensions_mut()
                .insert(AuthedMerchant { merchant_id });
            Ok(next.run(request).await)
        }
        None => {
            // Expired or revoked: clear the stale cookie alongside the 401
            let mut resp = AppError::new(ErrorCode::SessionExpired).into_response();
            resp.headers_mut()
                .insert(SET_COOKIE, clear_cookie_header());
            Err(resp)
        }
    }
}

/// Build the Set-Cookie value for a freshly issued session token.
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; HttpOnly; Path=/; Max-Age={COOKIE_MAX_AGE_SECS}; SameSite=Lax"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Set-Cookie header value that removes the session cookie.
pub fn clear_cookie_header() -> HeaderValue {
    HeaderValue::from_static("terminal_session=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax")
}

/// Extract a cookie value from the Cookie header.
pub fn cookie_value(headers: &http::HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(http::header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name && !v.is_empty()).then(|| v.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderMap;

    #[test]
    fn test_cookie_value_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::COOKIE,
            HeaderValue::from_static("other=1; terminal_session=sess_123_abc; x=y"),
        );
        assert_eq!(
            cookie_value(&headers, SESSION_COOKIE).as_deref(),
            Some("sess_123_abc")
        );
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_cookie_absent() {
        assert_eq!(cookie_value(&HeaderMap::new(), SESSION_COOKIE), None);
    }

    #[test]
    fn test_session_cookie_flags() {
        let dev = session_cookie("tok", false);
        assert!(dev.contains("HttpOnly"));
        assert!(dev.contains("Max-Age=604800"));
        assert!(!dev.contains("Secure"));

        let prod = session_cookie("tok", true);
        assert!(prod.ends_with("; Secure"));
    }
}

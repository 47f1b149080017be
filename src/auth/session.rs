//! Per-request identity extraction
//!
//! API routes read a bearer token from the Authorization header and reject
//! with 401 when it is missing or invalid. Page routes read the access token
//! cookie and, on any failure, send the browser back to the login page with
//! the cookie cleared. Both carriers share `TokenManager::validate`.

use std::sync::Arc;

use warp::http::header::{LOCATION, SET_COOKIE};
use warp::http::{Response, StatusCode};
use warp::hyper::Body;
use warp::{Filter, Rejection};

use crate::auth::token::{IdentityContext, TokenManager};
use crate::constants::{ACCESS_TOKEN_COOKIE, LOGIN_PAGE_PATH};
use crate::error::{Result, RustyTodoError};

/// Extracts bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    let (scheme, token) = auth_header.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Resolve the caller of an API route from its Authorization header
pub fn identity_from_header(
    auth_header: Option<&str>,
    tokens: &TokenManager,
) -> Result<IdentityContext> {
    let token = auth_header
        .and_then(extract_bearer_token)
        .ok_or(RustyTodoError::MissingCredentials)?;

    tokens.validate(token).map_err(|reason| {
        log::debug!(target: "security", "Bearer token refused: {}", reason);
        RustyTodoError::InvalidToken(reason)
    })
}

/// Resolve the caller of a page route from its access token cookie
///
/// Every failure collapses into `LoginRequired`.
pub fn identity_from_cookie(
    cookie: Option<&str>,
    tokens: &TokenManager,
) -> Result<IdentityContext> {
    let token = match cookie.map(str::trim).filter(|c| !c.is_empty()) {
        Some(token) => token,
        None => return Err(RustyTodoError::LoginRequired),
    };

    tokens.validate(token).map_err(|reason| {
        log::debug!(target: "security", "Access token cookie refused: {}", reason);
        RustyTodoError::LoginRequired
    })
}

/// Filter yielding the caller of an API route, or a 401 rejection
pub fn api_identity(
    tokens: Arc<TokenManager>,
) -> impl Filter<Extract = (IdentityContext,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization").and_then(move |header: Option<String>| {
        let tokens = tokens.clone();
        async move {
            identity_from_header(header.as_deref(), &tokens).map_err(warp::reject::custom)
        }
    })
}

/// Filter yielding the caller of a page route, or a login redirect rejection
pub fn page_identity(
    tokens: Arc<TokenManager>,
) -> impl Filter<Extract = (IdentityContext,), Error = Rejection> + Clone {
    warp::cookie::optional::<String>(ACCESS_TOKEN_COOKIE).and_then(move |cookie: Option<String>| {
        let tokens = tokens.clone();
        async move {
            identity_from_cookie(cookie.as_deref(), &tokens).map_err(warp::reject::custom)
        }
    })
}

/// Set-Cookie value carrying a freshly issued access token
pub fn access_token_cookie(token: &str, max_age: chrono::Duration, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        ACCESS_TOKEN_COOKIE,
        token,
        max_age.num_seconds()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Set-Cookie value that removes the access token cookie
pub fn clear_access_token_cookie() -> String {
    format!(
        "{}=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; SameSite=Lax",
        ACCESS_TOKEN_COOKIE
    )
}

/// Redirect to the login page, dropping whatever token the browser held
pub fn redirect_to_login() -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::TEMPORARY_REDIRECT;
    let headers = response.headers_mut();
    headers.insert(LOCATION, warp::http::HeaderValue::from_static(LOGIN_PAGE_PATH));
    if let Ok(value) = warp::http::HeaderValue::from_str(&clear_access_token_cookie()) {
        headers.insert(SET_COOKIE, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::user::UserRole;

    const KEY: &str = "unit-tests-only-signing-key-never-in-production-9f8e7d";

    fn issued(manager: &TokenManager) -> String {
        manager
            .issue("alice", 1, UserRole::User, chrono::Duration::minutes(30))
            .unwrap()
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("abc.def.ghi"), None);
    }

    #[test]
    fn test_header_carrier() {
        let manager = TokenManager::new(KEY);
        let header = format!("Bearer {}", issued(&manager));

        let identity = identity_from_header(Some(&header), &manager).unwrap();
        assert_eq!(identity.username(), "alice");

        assert!(matches!(
            identity_from_header(None, &manager),
            Err(RustyTodoError::MissingCredentials)
        ));
        assert!(matches!(
            identity_from_header(Some("Bearer not-a-token"), &manager),
            Err(RustyTodoError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_cookie_carrier_collapses_failures() {
        let manager = TokenManager::new(KEY);
        let token = issued(&manager);

        assert_eq!(identity_from_cookie(Some(&token), &manager).unwrap().user_id(), 1);
        for bad in [None, Some(""), Some("garbage")] {
            assert!(matches!(
                identity_from_cookie(bad, &manager),
                Err(RustyTodoError::LoginRequired)
            ));
        }
    }

    #[test]
    fn test_redirect_clears_cookie() {
        let response = redirect_to_login();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[LOCATION], LOGIN_PAGE_PATH);
        let cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("access_token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_access_token_cookie() {
        let cookie = access_token_cookie("abc", chrono::Duration::minutes(30), true);
        assert!(cookie.starts_with("access_token=abc;"));
        assert!(cookie.contains("Max-Age=1800"));
        assert!(cookie.ends_with("; Secure"));
    }
}

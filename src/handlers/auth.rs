//! Registration and token endpoints

use serde::{Deserialize, Serialize};
use warp::http::header::SET_COOKIE;
use warp::http::{HeaderValue, StatusCode};
use warp::reply::Response;
use warp::{Rejection, Reply};

use crate::auth::credentials;
use crate::auth::session::access_token_cookie;
use crate::auth::user::CreateUserRequest;
use crate::constants::TOKEN_TYPE;
use crate::core::AppState;
use crate::security::add_api_security_headers;

/// Form fields of `POST /auth/token`
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Body returned by a successful login
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// `POST /auth/` - register a new user
pub async fn register_user(
    request: CreateUserRequest,
    state: AppState,
) -> Result<Response, Rejection> {
    let session = state
        .storage
        .open_session()
        .await
        .map_err(warp::reject::custom)?;

    credentials::register(&*session, &state.hasher, request)
        .await
        .map_err(warp::reject::custom)?;

    let response = warp::reply::with_status(warp::reply(), StatusCode::CREATED).into_response();
    Ok(add_api_security_headers(response))
}

/// `POST /auth/token` - exchange credentials for an access token
///
/// The token is returned in the body and also set as an HttpOnly cookie so
/// page routes work without client-side scripting.
pub async fn login_for_access_token(
    form: LoginForm,
    state: AppState,
) -> Result<Response, Rejection> {
    let session = state
        .storage
        .open_session()
        .await
        .map_err(warp::reject::custom)?;

    let user = credentials::authenticate(&*session, &state.hasher, &form.username, &form.password)
        .await
        .map_err(warp::reject::custom)?;

    let token = state
        .tokens
        .issue(&user.username, user.id, user.role, state.token_ttl)
        .map_err(warp::reject::custom)?;

    let cookie = access_token_cookie(&token, state.token_ttl, state.secure_cookies);
    let body = TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE.to_string(),
    };

    let mut response = warp::reply::json(&body).into_response();
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(SET_COOKIE, value);
    }

    log::info!("Issued access token for user {}", user.id);
    Ok(add_api_security_headers(response))
}

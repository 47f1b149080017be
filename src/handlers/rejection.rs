//! Turns rejections into HTTP responses
//!
//! API failures become JSON `{"detail": ...}` bodies. The page identity
//! filter's `LoginRequired` becomes a login redirect that clears the cookie.

use serde::Serialize;
use std::convert::Infallible;
use warp::filters::body::BodyDeserializeError;
use warp::http::header::WWW_AUTHENTICATE;
use warp::http::{HeaderValue, StatusCode};
use warp::reply::Response;
use warp::{Rejection, Reply};

use crate::auth::session::redirect_to_login;
use crate::error::RustyTodoError;
use crate::security::add_api_security_headers;

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

fn json_error(status: StatusCode, detail: impl Into<String>) -> Response {
    let body = ErrorBody {
        detail: detail.into(),
    };
    let reply = warp::reply::with_status(warp::reply::json(&body), status);
    add_api_security_headers(reply.into_response())
}

/// Response for a crate error raised on an API route
pub fn error_response(err: &RustyTodoError) -> Response {
    if let RustyTodoError::LoginRequired = err {
        return redirect_to_login();
    }

    let status = err.status_code();
    if status.is_server_error() {
        log::error!("Request failed: {}", err);
    }

    let mut response = json_error(status, err.public_detail());
    if err.is_unauthenticated() {
        response
            .headers_mut()
            .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    response
}

/// Recover handler for the whole route tree
pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    if let Some(e) = err.find::<RustyTodoError>() {
        return Ok(error_response(e));
    }

    if let Some(e) = err.find::<BodyDeserializeError>() {
        log::debug!("Rejected request body: {}", e);
        return Ok(json_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()));
    }

    if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        return Ok(json_error(StatusCode::PAYLOAD_TOO_LARGE, "Payload too large"));
    }

    if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        return Ok(json_error(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Unsupported media type",
        ));
    }

    if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(json_error(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed"));
    }

    if err.is_not_found() {
        return Ok(json_error(StatusCode::NOT_FOUND, "Not Found"));
    }

    if err.find::<warp::reject::InvalidQuery>().is_some()
        || err.find::<warp::reject::MissingHeader>().is_some()
        || err.find::<warp::reject::InvalidHeader>().is_some()
    {
        return Ok(json_error(StatusCode::BAD_REQUEST, "Bad request"));
    }

    log::error!("Unhandled rejection: {:?}", err);
    Ok(json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenError;

    #[tokio::test]
    async fn test_unauthenticated_has_challenge() {
        let rejection = warp::reject::custom(RustyTodoError::InvalidToken(TokenError::Expired));
        let response = handle_rejection(rejection).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[WWW_AUTHENTICATE], "Bearer");
    }

    #[tokio::test]
    async fn test_login_required_redirects() {
        let rejection = warp::reject::custom(RustyTodoError::LoginRequired);
        let response = handle_rejection(rejection).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    #[tokio::test]
    async fn test_plain_not_found() {
        let response = handle_rejection(warp::reject::not_found()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

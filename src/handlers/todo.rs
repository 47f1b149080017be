//! Todo API endpoints
//!
//! Every handler receives an `IdentityContext` from the bearer filter and
//! works through a `TodoGate` bound to it.

use serde::Serialize;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Rejection, Reply};

use crate::auth::IdentityContext;
use crate::core::AppState;
use crate::error::{Result, RustyTodoError};
use crate::security::add_api_security_headers;
use crate::todos::{TodoGate, TodoId, TodoRequest};

#[derive(Debug, Serialize)]
struct CreatedResponse {
    message: &'static str,
    id: TodoId,
}

/// Path ids are store-assigned and start at 1
pub fn check_todo_id(todo_id: TodoId) -> Result<TodoId> {
    if todo_id == 0 {
        return Err(RustyTodoError::ValidationError(
            "todo id must be greater than 0".to_string(),
        ));
    }
    Ok(todo_id)
}

fn no_content() -> Response {
    add_api_security_headers(StatusCode::NO_CONTENT.into_response())
}

/// `GET /todo/`
pub async fn list_todos(
    caller: IdentityContext,
    state: AppState,
) -> std::result::Result<Response, Rejection> {
    let session = state.storage.open_session().await.map_err(warp::reject::custom)?;

    let todos = TodoGate::new(&*session, &caller)
        .list()
        .await
        .map_err(warp::reject::custom)?;

    Ok(add_api_security_headers(warp::reply::json(&todos).into_response()))
}

/// `GET /todo/todo/{id}`
pub async fn read_todo(
    todo_id: TodoId,
    caller: IdentityContext,
    state: AppState,
) -> std::result::Result<Response, Rejection> {
    let todo_id = check_todo_id(todo_id).map_err(warp::reject::custom)?;
    let session = state.storage.open_session().await.map_err(warp::reject::custom)?;

    let todo = TodoGate::new(&*session, &caller)
        .get(todo_id)
        .await
        .map_err(warp::reject::custom)?;

    Ok(add_api_security_headers(warp::reply::json(&todo).into_response()))
}

/// `POST /todo/todo`
pub async fn create_todo(
    caller: IdentityContext,
    request: TodoRequest,
    state: AppState,
) -> std::result::Result<Response, Rejection> {
    let fields = request.validate().map_err(warp::reject::custom)?;
    let session = state.storage.open_session().await.map_err(warp::reject::custom)?;

    let id = TodoGate::new(&*session, &caller)
        .create(fields, state.enricher.as_ref())
        .await
        .map_err(warp::reject::custom)?;

    let body = CreatedResponse {
        message: "Todo created successfully",
        id,
    };
    let response = warp::reply::with_status(warp::reply::json(&body), StatusCode::CREATED);
    Ok(add_api_security_headers(response.into_response()))
}

/// `PUT /todo/todo/{id}`
pub async fn update_todo(
    todo_id: TodoId,
    caller: IdentityContext,
    request: TodoRequest,
    state: AppState,
) -> std::result::Result<Response, Rejection> {
    let todo_id = check_todo_id(todo_id).map_err(warp::reject::custom)?;
    let fields = request.validate().map_err(warp::reject::custom)?;
    let session = state.storage.open_session().await.map_err(warp::reject::custom)?;

    TodoGate::new(&*session, &caller)
        .update(todo_id, fields)
        .await
        .map_err(warp::reject::custom)?;

    Ok(no_content())
}

/// `DELETE /todo/todo/{id}`
pub async fn delete_todo(
    todo_id: TodoId,
    caller: IdentityContext,
    state: AppState,
) -> std::result::Result<Response, Rejection> {
    let todo_id = check_todo_id(todo_id).map_err(warp::reject::custom)?;
    let session = state.storage.open_session().await.map_err(warp::reject::custom)?;

    TodoGate::new(&*session, &caller)
        .delete(todo_id)
        .await
        .map_err(warp::reject::custom)?;

    Ok(no_content())
}

//! Request handlers and the route tree

pub mod auth;
pub mod pages;
pub mod rejection;
pub mod todo;

use std::convert::Infallible;
use warp::http::Uri;
use warp::{Filter, Reply};

use crate::auth::session::{api_identity, page_identity};
use crate::constants::TODO_PAGE_PATH;
use crate::core::AppState;

// Re-export the recover handler
pub use rejection::handle_rejection;

/// Request bodies are small JSON documents or login forms
const MAX_BODY_BYTES: u64 = 16 * 1024;

// Helper function to include application state in request
fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// `/auth/...` routes
pub fn auth_routes(
    state: AppState,
) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    let register = warp::path!("auth")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(auth::register_user);

    let login = warp::path!("auth" / "token")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::form())
        .and(with_state(state))
        .and_then(auth::login_for_access_token);

    let login_page = warp::path!("auth" / "login-page")
        .and(warp::get())
        .and_then(pages::login_page);

    let register_page = warp::path!("auth" / "register-page")
        .and(warp::get())
        .and_then(pages::register_page);

    register.or(login).or(login_page).or(register_page)
}

/// `/todo/...` API and page routes
pub fn todo_routes(
    state: AppState,
) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    let api_caller = api_identity(state.tokens.clone());
    let page_caller = page_identity(state.tokens.clone());

    let list = warp::path!("todo")
        .and(warp::get())
        .and(api_caller.clone())
        .and(with_state(state.clone()))
        .and_then(todo::list_todos);

    let read = warp::path!("todo" / "todo" / u64)
        .and(warp::get())
        .and(api_caller.clone())
        .and(with_state(state.clone()))
        .and_then(todo::read_todo);

    let create = warp::path!("todo" / "todo")
        .and(warp::post())
        .and(api_caller.clone())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(todo::create_todo);

    let update = warp::path!("todo" / "todo" / u64)
        .and(warp::put())
        .and(api_caller.clone())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(todo::update_todo);

    let delete = warp::path!("todo" / "todo" / u64)
        .and(warp::delete())
        .and(api_caller)
        .and(with_state(state.clone()))
        .and_then(todo::delete_todo);

    let todo_page = warp::path!("todo" / "todo-page")
        .and(warp::get())
        .and(page_caller.clone())
        .and(with_state(state.clone()))
        .and_then(pages::todo_page);

    let add_todo_page = warp::path!("todo" / "add-todo-page")
        .and(warp::get())
        .and(page_caller.clone())
        .and_then(pages::add_todo_page);

    let edit_todo_page = warp::path!("todo" / "edit-todo-page" / u64)
        .and(warp::get())
        .and(page_caller)
        .and(with_state(state))
        .and_then(pages::edit_todo_page);

    list.or(read)
        .or(create)
        .or(update)
        .or(delete)
        .or(todo_page)
        .or(add_todo_page)
        .or(edit_todo_page)
}

/// The complete application: every route plus rejection handling
pub fn routes(
    state: AppState,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let root = warp::path::end()
        .and(warp::get())
        .map(|| warp::redirect::found(Uri::from_static(TODO_PAGE_PATH)));

    root.or(auth_routes(state.clone()))
        .or(todo_routes(state))
        .recover(handle_rejection)
        .with(warp::log("rusty_todo::access"))
}

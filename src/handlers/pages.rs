//! Browser-facing pages
//!
//! Pages never show a raw error. A missing todo renders a plain 404 page;
//! any other failure sends the browser back to the login page with its
//! access token cookie cleared.

use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Rejection, Reply};

use crate::auth::session::redirect_to_login;
use crate::auth::IdentityContext;
use crate::core::AppState;
use crate::error::RustyTodoError;
use crate::handlers::todo::check_todo_id;
use crate::security::{add_page_security_headers, encode_html};
use crate::todos::{Todo, TodoGate, TodoId};

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        encode_html(title),
        body
    )
}

fn html_page(status: StatusCode, title: &str, body: &str) -> Response {
    let reply = warp::reply::with_status(warp::reply::html(layout(title, body)), status);
    add_page_security_headers(reply.into_response())
}

/// Turn a failed page operation into something a browser can recover from
fn page_failure(err: RustyTodoError) -> Response {
    match err {
        RustyTodoError::NotFound(_) => html_page(
            StatusCode::NOT_FOUND,
            "Not found",
            "<p>Todo not found.</p>\n<p><a href=\"/todo/todo-page\">Back to your todos</a></p>",
        ),
        other => {
            log::error!("Page request failed, sending browser to login: {}", other);
            redirect_to_login()
        }
    }
}

fn render_todo_row(todo: &Todo) -> String {
    format!(
        "<li data-id=\"{id}\"{done}><strong>{title}</strong> (priority {priority})<br>{description} <a href=\"/todo/edit-todo-page/{id}\">edit</a></li>",
        id = todo.id,
        done = if todo.complete { " class=\"complete\"" } else { "" },
        title = encode_html(&todo.title),
        priority = todo.priority,
        description = encode_html(&todo.description),
    )
}

/// `GET /auth/login-page`
pub async fn login_page() -> Result<Response, Rejection> {
    Ok(html_page(
        StatusCode::OK,
        "Login",
        "<h1>Login</h1>\n<form method=\"post\" action=\"/auth/token\">\n<input name=\"username\" placeholder=\"Username\" required>\n<input name=\"password\" type=\"password\" placeholder=\"Password\" required>\n<button type=\"submit\">Login</button>\n</form>\n<p><a href=\"/auth/register-page\">Register</a></p>",
    ))
}

/// `GET /auth/register-page`
pub async fn register_page() -> Result<Response, Rejection> {
    Ok(html_page(
        StatusCode::OK,
        "Register",
        "<h1>Register</h1>\n<form id=\"register\">\n<input name=\"username\" placeholder=\"Username\" required>\n<input name=\"email\" type=\"email\" placeholder=\"Email\" required>\n<input name=\"first_name\" placeholder=\"First name\" required>\n<input name=\"last_name\" placeholder=\"Last name\" required>\n<select name=\"role\"><option value=\"user\">user</option><option value=\"admin\">admin</option></select>\n<input name=\"password\" type=\"password\" placeholder=\"Password\" required>\n<button type=\"submit\">Register</button>\n</form>\n<p><a href=\"/auth/login-page\">Login</a></p>",
    ))
}

/// `GET /todo/todo-page`
pub async fn todo_page(caller: IdentityContext, state: AppState) -> Result<Response, Rejection> {
    let session = match state.storage.open_session().await {
        Ok(session) => session,
        Err(e) => return Ok(page_failure(e)),
    };

    let todos = match TodoGate::new(&*session, &caller).list().await {
        Ok(todos) => todos,
        Err(e) => return Ok(page_failure(e)),
    };

    let rows: Vec<String> = todos.iter().map(render_todo_row).collect();
    let body = format!(
        "<h1>Todos for {}</h1>\n<ul id=\"todos\">\n{}\n</ul>\n<p><a href=\"/todo/add-todo-page\">Add todo</a></p>",
        encode_html(caller.username()),
        rows.join("\n")
    );
    Ok(html_page(StatusCode::OK, "Todos", &body))
}

/// `GET /todo/add-todo-page`
pub async fn add_todo_page(caller: IdentityContext) -> Result<Response, Rejection> {
    let body = format!(
        "<h1>New todo for {}</h1>\n<form id=\"add-todo\">\n<input name=\"title\" minlength=\"3\" maxlength=\"50\" required>\n<textarea name=\"description\" minlength=\"3\" maxlength=\"1000\" required></textarea>\n<input name=\"priority\" type=\"number\" min=\"1\" max=\"5\" value=\"1\">\n<button type=\"submit\">Add</button>\n</form>",
        encode_html(caller.username())
    );
    Ok(html_page(StatusCode::OK, "Add todo", &body))
}

/// `GET /todo/edit-todo-page/{id}`
pub async fn edit_todo_page(
    todo_id: TodoId,
    caller: IdentityContext,
    state: AppState,
) -> Result<Response, Rejection> {
    let todo_id = match check_todo_id(todo_id) {
        Ok(id) => id,
        Err(_) => return Ok(page_failure(RustyTodoError::NotFound("Todo".to_string()))),
    };

    let session = match state.storage.open_session().await {
        Ok(session) => session,
        Err(e) => return Ok(page_failure(e)),
    };

    let todo = match TodoGate::new(&*session, &caller).get(todo_id).await {
        Ok(todo) => todo,
        Err(e) => return Ok(page_failure(e)),
    };

    let body = format!(
        "<h1>Edit todo</h1>\n<form id=\"edit-todo\" data-id=\"{id}\">\n<input name=\"title\" value=\"{title}\" minlength=\"3\" maxlength=\"50\" required>\n<textarea name=\"description\" minlength=\"3\" maxlength=\"1000\" required>{description}</textarea>\n<input name=\"priority\" type=\"number\" min=\"1\" max=\"5\" value=\"{priority}\">\n<input name=\"complete\" type=\"checkbox\"{checked}>\n<button type=\"submit\">Save</button>\n</form>",
        id = todo.id,
        title = encode_html(&todo.title),
        description = encode_html(&todo.description),
        priority = todo.priority,
        checked = if todo.complete { " checked" } else { "" },
    );
    Ok(html_page(StatusCode::OK, "Edit todo", &body))
}

pub mod clerk;
pub mod storage_manager;
pub mod analyst;
pub mod manager;
pub mod inventory_manager;
pub mod reports;
pub mod forms;
pub mod queries;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use askama::Template;
use tower_cookies::Cookies;

use crate::{
    database::Database,
    middleware::get_current_user,
    models::resolve_role_view,
};

#[derive(Template)]
#[template(path = "no_permission.html")]
struct NoPermissionTemplate {
    username: String,
}

/// Permission router: redirects to the first role view whose permission the
/// user holds, in the fixed priority order of the dispatch table; renders
/// the no-permission page when nothing matches.
pub async fn dashboard(
    cookies: Cookies,
    State(db): State<Database>,
) -> Result<Response, StatusCode> {
    let user = get_current_user(cookies, &db).await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    match resolve_role_view(&user.permissions) {
        Some(target) => Ok(Redirect::to(target).into_response()),
        None => {
            let template = NoPermissionTemplate { username: user.username };
            Ok(Html(template.render().unwrap()).into_response())
        }
    }
}

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{error, instrument};

use super::cookie::{clear_session_cookie, extract_session_token};
use crate::{api::AppState, auth::Greeting};

#[utoipa::path(
    get,
    path = "/",
    params(
        ("username" = Option<String>, Cookie, description = "Session token issued by /login")
    ),
    responses(
        (status = 200, description = "Login form, or a greeting for a valid session", body = String, content_type = "text/html")
    ),
    tag = "session"
)]
#[instrument(skip_all)]
pub async fn index(headers: HeaderMap, state: Extension<Arc<AppState>>) -> Response {
    let token = extract_session_token(&headers);

    match state.auth.greet(token.as_deref()) {
        Greeting::Welcome { display_name } => Html(format!("Hello, {display_name}!")).into_response(),
        Greeting::LoginForm => Html(state.login_page.clone()).into_response(),
        Greeting::LoginFormClearCookie => {
            let mut response_headers = HeaderMap::new();
            match clear_session_cookie() {
                Ok(cookie) => {
                    response_headers.insert(SET_COOKIE, cookie);
                }
                Err(err) => error!("Failed to build clear-cookie header: {err}"),
            }
            (response_headers, Html(state.login_page.clone())).into_response()
        }
    }
}

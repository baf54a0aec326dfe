use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use tracing::error;
use utoipa::ToSchema;

use super::cookie::session_cookie;
use crate::api::AppState;

#[derive(ToSchema, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login result; sets the `username` cookie on success", body = LoginResponse, content_type = "application/json"),
        (status = 422, description = "Missing username or password field")
    ),
    tag = "session"
)]
pub async fn login(
    state: Extension<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> impl IntoResponse {
    let outcome = state.auth.login(&form.username, &form.password);

    let mut headers = HeaderMap::new();
    if let Some(token) = &outcome.token {
        match session_cookie(token) {
            Ok(cookie) => {
                headers.insert(SET_COOKIE, cookie);
            }
            Err(err) => error!("Failed to build session cookie: {err}"),
        }
    }

    (
        StatusCode::OK,
        headers,
        Json(LoginResponse {
            success: outcome.success,
            message: outcome.message,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::test_support::app_state, auth::LOGIN_FAILED_MESSAGE};
    use anyhow::Result;
    use axum::{body::to_bytes, response::Response};

    fn form(username: &str, password: &str) -> Form<LoginForm> {
        Form(LoginForm {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    async fn decode(response: Response) -> Result<LoginResponse> {
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    #[tokio::test]
    async fn login_success_sets_cookie() -> Result<()> {
        let state = app_state()?;
        let expected_cookie = format!("username={}; Path=/", state.auth.issue_token("alice"));

        let response = login(Extension(state), form("alice", "secret1"))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(SET_COOKIE)
                .and_then(|v| v.to_str().ok()),
            Some(expected_cookie.as_str())
        );
        assert_eq!(
            decode(response).await?,
            LoginResponse {
                success: true,
                message: "Hello, Alice. <br />Your balance: 100000".to_string(),
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn login_wrong_password_sets_no_cookie() -> Result<()> {
        let response = login(Extension(app_state()?), form("alice", "wrong"))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(SET_COOKIE).is_none());
        assert_eq!(
            decode(response).await?,
            LoginResponse {
                success: false,
                message: LOGIN_FAILED_MESSAGE.to_string(),
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn login_unknown_user_matches_wrong_password() -> Result<()> {
        let state = app_state()?;
        let unknown = login(Extension(state.clone()), form("mallory", "secret1"))
            .await
            .into_response();
        let wrong = login(Extension(state), form("alice", "nope"))
            .await
            .into_response();
        assert_eq!(decode(unknown).await?, decode(wrong).await?);
        Ok(())
    }

    #[test]
    fn login_form_debug_hides_password() {
        let rendered = format!(
            "{:?}",
            LoginForm {
                username: "alice".to_string(),
                password: "secret1".to_string(),
            }
        );
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("secret1"));
    }
}

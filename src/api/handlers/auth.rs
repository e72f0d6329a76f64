use super::HxRedirect;
use crate::AppState;
use crate::api::error::AppError;
use crate::api::middleware::auth::session_token;
use crate::services::account_service::NewAccount;
use axum::{Form, extract::State, http::HeaderMap};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{debug, info};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct SignUpForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[utoipa::path(
    post,
    path = "/signup",
    request_body(content = SignUpForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 202, description = "Account created, redirect to /login"),
        (status = 400, description = "Blank fields, short username or weak password"),
        (status = 409, description = "Email or username already in use")
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignUpForm>,
) -> Result<HxRedirect, AppError> {
    state
        .accounts
        .create_account(NewAccount {
            username: form.username,
            email: form.email,
            password: form.password,
        })
        .await?;

    Ok(HxRedirect::to("/login"))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 202, description = "Session cookie set, redirect to /main"),
        (status = 401, description = "Incorrect login info")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, HxRedirect), AppError> {
    let signed_in = state
        .accounts
        .sign_in(&form.username, &form.password)
        .await?;

    let token = state.sessions.issue(signed_in.user.id).await?;

    info!("🔓 User {} signed in", signed_in.user.id);
    debug!(
        "User {} has {} folder(s) in their collection",
        signed_in.user.id,
        signed_in.folders.len()
    );

    Ok((jar.add(state.sessions.cookie(token)), HxRedirect::to("/main")))
}

#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 202, description = "Session revoked and cookie cleared, redirect to /")
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, HxRedirect), AppError> {
    if let Some(token) = session_token(&state, &headers)
        && let Ok(claims) = state.sessions.resolve(&token).await
    {
        state.sessions.revoke(&claims.jti).await?;
        info!("🔒 User {} signed out", claims.sub);
    }

    Ok((
        jar.add(state.sessions.removal_cookie()),
        HxRedirect::to("/"),
    ))
}

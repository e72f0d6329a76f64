use super::HxRedirect;
use super::folders::FolderResponse;
use crate::AppState;
use crate::api::error::AppError;
use crate::entities::users;
use crate::utils::auth::SessionClaims;
use axum::{Extension, Form, Json, extract::State};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct UserProfileResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub profile_picture: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<users::Model> for UserProfileResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            profile_picture: user.profile_picture,
            created_at: user.created_at,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct UpdatePasswordForm {
    #[serde(default, rename = "currentPassword")]
    pub current_password: String,
    #[serde(default, rename = "newPassword")]
    pub new_password: String,
}

#[utoipa::path(
    get,
    path = "/user",
    responses(
        (status = 200, description = "Profile of the signed-in user", body = UserProfileResponse),
        (status = 401, description = "Not authenticated")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<UserProfileResponse>, AppError> {
    let user = state.accounts.get_user(claims.sub).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    get,
    path = "/folders",
    responses(
        (status = 200, description = "Folders owned by the signed-in user, newest first", body = [FolderResponse]),
        (status = 401, description = "Not authenticated")
    ),
    tag = "users"
)]
pub async fn get_folders(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<Vec<FolderResponse>>, AppError> {
    let folders = state.accounts.get_user_folders(claims.sub).await?;
    Ok(Json(folders.into_iter().map(FolderResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/password",
    request_body(content = UpdatePasswordForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 202, description = "Password updated, redirect to /account"),
        (status = 400, description = "Blank, weak or unchanged password"),
        (status = 401, description = "Current password is incorrect")
    ),
    tag = "users"
)]
pub async fn update_password(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Form(form): Form<UpdatePasswordForm>,
) -> Result<HxRedirect, AppError> {
    state
        .accounts
        .update_password(claims.sub, &form.current_password, &form.new_password)
        .await?;

    Ok(HxRedirect::to("/account"))
}

#[utoipa::path(
    delete,
    path = "/user",
    responses(
        (status = 202, description = "Account and everything it owns deleted, redirect to /"),
        (status = 401, description = "Not authenticated")
    ),
    tag = "users"
)]
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    jar: CookieJar,
) -> Result<(CookieJar, HxRedirect), AppError> {
    state.accounts.delete_account(claims.sub).await?;

    Ok((
        jar.add(state.sessions.removal_cookie()),
        HxRedirect::to("/"),
    ))
}

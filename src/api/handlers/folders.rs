use super::HxRedirect;
use crate::AppState;
use crate::api::error::AppError;
use crate::entities::{folders, items, users};
use crate::services::folder_service::{FolderDetails, NewFolder};
use crate::utils::auth::SessionClaims;
use axum::{
    Extension, Form, Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct FolderResponse {
    pub id: i32,
    pub name: String,
    pub owner: i32,
    pub owner_username: String,
    pub private: bool,
    pub cover_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<folders::Model> for FolderResponse {
    fn from(folder: folders::Model) -> Self {
        Self {
            id: folder.id,
            name: folder.name,
            owner: folder.owner,
            owner_username: folder.owner_username,
            private: folder.private,
            cover_url: folder.cover_url,
            created_at: folder.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ItemResponse {
    pub id: i32,
    pub name: String,
    pub url: String,
    pub folder_id: i32,
    pub owner_id: i32,
    pub created_at: DateTime<Utc>,
}

impl From<items::Model> for ItemResponse {
    fn from(item: items::Model) -> Self {
        Self {
            id: item.id,
            name: item.name,
            url: item.url,
            folder_id: item.folder_id,
            owner_id: item.owner_id,
            created_at: item.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ContributorResponse {
    pub id: i32,
    pub username: String,
    pub profile_picture: Option<String>,
}

impl From<users::Model> for ContributorResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            profile_picture: user.profile_picture,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct FolderDetailsResponse {
    pub folder: FolderResponse,
    pub items: Vec<ItemResponse>,
    pub contributors: Vec<ContributorResponse>,
}

impl From<FolderDetails> for FolderDetailsResponse {
    fn from(details: FolderDetails) -> Self {
        Self {
            folder: details.folder.into(),
            items: details.items.into_iter().map(ItemResponse::from).collect(),
            contributors: details
                .contributors
                .into_iter()
                .map(ContributorResponse::from)
                .collect(),
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateFolderForm {
    #[serde(default, rename = "folderTitle")]
    pub folder_title: String,
    /// `"private"` marks the folder private; anything else is public.
    #[serde(default, rename = "isPrivate")]
    pub is_private: Option<String>,
    #[serde(default, rename = "coverUrl")]
    pub cover_url: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct AddContributorForm {
    #[serde(rename = "userId")]
    pub user_id: i32,
}

#[utoipa::path(
    post,
    path = "/folder",
    request_body(content = CreateFolderForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 202, description = "Folder created, redirect to /main"),
        (status = 400, description = "Blank name or malformed cover URL"),
        (status = 401, description = "Not authenticated")
    ),
    tag = "folders"
)]
pub async fn create_folder(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Form(form): Form<CreateFolderForm>,
) -> Result<HxRedirect, AppError> {
    state
        .folders
        .create_folder(
            claims.sub,
            NewFolder {
                name: form.folder_title,
                private: form.is_private.as_deref() == Some("private"),
                cover_url: form.cover_url,
            },
        )
        .await?;

    Ok(HxRedirect::to("/main"))
}

#[utoipa::path(
    get,
    path = "/folder/{id}",
    params(("id" = i32, Path, description = "Folder id")),
    responses(
        (status = 200, description = "Folder with items and contributors", body = FolderDetailsResponse),
        (status = 404, description = "Folder not found or not visible to the caller")
    ),
    tag = "folders"
)]
pub async fn get_folder(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<i32>,
) -> Result<Json<FolderDetailsResponse>, AppError> {
    let details = state.folders.get_folder_for(id, claims.sub).await?;
    Ok(Json(details.into()))
}

#[utoipa::path(
    delete,
    path = "/folder/{id}",
    params(("id" = i32, Path, description = "Folder id")),
    responses(
        (status = 202, description = "Folder and its items deleted, redirect to /main"),
        (status = 403, description = "Caller is not the folder owner"),
        (status = 404, description = "Folder not found")
    ),
    tag = "folders"
)]
pub async fn delete_folder(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<i32>,
) -> Result<HxRedirect, AppError> {
    state.folders.delete_folder(id, claims.sub).await?;
    Ok(HxRedirect::to("/main"))
}

#[utoipa::path(
    post,
    path = "/folder/{id}/contributor",
    params(("id" = i32, Path, description = "Folder id")),
    request_body(content = AddContributorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 202, description = "Contributor added, redirect to the folder"),
        (status = 403, description = "Caller is not the folder owner"),
        (status = 404, description = "Folder or user not found")
    ),
    tag = "folders"
)]
pub async fn add_contributor(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<i32>,
    Form(form): Form<AddContributorForm>,
) -> Result<HxRedirect, AppError> {
    state
        .folders
        .add_contributor(id, claims.sub, form.user_id)
        .await?;

    Ok(HxRedirect::to(format!("/folder/{}", id)))
}

#[utoipa::path(
    get,
    path = "/feed",
    responses(
        (status = 200, description = "Newest public folders", body = [FolderResponse]),
        (status = 401, description = "Not authenticated")
    ),
    tag = "folders"
)]
pub async fn get_feed(State(state): State<AppState>) -> Result<Json<Vec<FolderResponse>>, AppError> {
    let folders = state.folders.get_feed().await?;
    Ok(Json(folders.into_iter().map(FolderResponse::from).collect()))
}

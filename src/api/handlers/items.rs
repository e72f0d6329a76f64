use super::HxRedirect;
use crate::AppState;
use crate::api::error::AppError;
use crate::services::item_service::NewItem;
use crate::utils::auth::SessionClaims;
use axum::{
    Extension, Form,
    extract::{Path, State},
};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct AddItemForm {
    #[serde(default, rename = "itemName")]
    pub item_name: String,
    #[serde(default, rename = "itemUrl")]
    pub item_url: String,
}

#[utoipa::path(
    post,
    path = "/folder/{id}/item",
    params(("id" = i32, Path, description = "Folder id")),
    request_body(content = AddItemForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 202, description = "Item added, redirect to the folder"),
        (status = 400, description = "Blank name or malformed URL"),
        (status = 403, description = "Caller may not add items to this folder"),
        (status = 404, description = "Folder not found")
    ),
    tag = "items"
)]
pub async fn add_item(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(folder_id): Path<i32>,
    Form(form): Form<AddItemForm>,
) -> Result<HxRedirect, AppError> {
    state
        .items
        .add_item(
            folder_id,
            claims.sub,
            NewItem {
                name: form.item_name,
                url: form.item_url,
            },
        )
        .await?;

    Ok(HxRedirect::to(format!("/folder/{}", folder_id)))
}

#[utoipa::path(
    delete,
    path = "/folder/{id}/item/{item_id}",
    params(
        ("id" = i32, Path, description = "Folder id"),
        ("item_id" = i32, Path, description = "Item id")
    ),
    responses(
        (status = 202, description = "Item deleted, redirect to the folder"),
        (status = 403, description = "Caller did not add this item"),
        (status = 404, description = "Folder or item not found")
    ),
    tag = "items"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path((folder_id, item_id)): Path<(i32, i32)>,
) -> Result<HxRedirect, AppError> {
    state
        .items
        .delete_item(folder_id, claims.sub, item_id)
        .await?;

    Ok(HxRedirect::to(format!("/folder/{}", folder_id)))
}

use crate::api::error::AppError;
use crate::entities::{prelude::*, *};
use crate::services::access::AccessPolicy;
use crate::services::folder_service::{ensure_visible, is_contributor};
use crate::utils::validation::{is_blank, validate_url};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Set, TransactionTrait};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub url: String,
}

pub struct ItemService {
    db: DatabaseConnection,
    policy: AccessPolicy,
}

impl ItemService {
    pub fn new(db: DatabaseConnection, policy: AccessPolicy) -> Self {
        Self { db, policy }
    }

    /// Adds an item to a folder. Folder and owner ids come from the path and
    /// the session, never from the submitted item.
    pub async fn add_item(
        &self,
        folder_id: i32,
        acting_user_id: i32,
        item: NewItem,
    ) -> Result<items::Model, AppError> {
        if is_blank(&item.name) || is_blank(&item.url) {
            return Err(AppError::Validation("Fields must not be blank".to_string()));
        }
        validate_url("Item URL", &item.url)?;

        let txn = self.db.begin().await.map_err(AppError::Database)?;

        let folder = Folders::find_by_id(folder_id)
            .one(&txn)
            .await
            .map_err(AppError::aborted("load folder"))?
            .ok_or_else(|| AppError::NotFound("Folder not found".to_string()))?;

        let user = Users::find_by_id(acting_user_id)
            .one(&txn)
            .await
            .map_err(AppError::aborted("load user"))?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        ensure_visible(&txn, &folder, user.id).await?;

        let contributor = self.policy.contributors_can_add_items
            && is_contributor(&txn, folder.id, user.id)
                .await
                .map_err(AppError::aborted("check contributor"))?;

        if !self.policy.can_add_item(&folder, user.id, contributor) {
            warn!(
                "🚫 User {} tried to add an item to folder {} owned by {}",
                user.id, folder.id, folder.owner
            );
            return Err(AppError::PermissionDenied(
                "You do not have permission to add items to this folder".to_string(),
            ));
        }

        let created = items::ActiveModel {
            name: Set(item.name.trim().to_string()),
            url: Set(item.url.trim().to_string()),
            folder_id: Set(folder.id),
            owner_id: Set(user.id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(AppError::aborted("insert item"))?;

        txn.commit().await.map_err(AppError::Database)?;

        info!(
            "🔗 Item {} added to folder {} by user {}",
            created.id, folder.id, user.id
        );
        Ok(created)
    }

    /// Permanently deletes an item. Only the user who added it may do so.
    pub async fn delete_item(
        &self,
        folder_id: i32,
        acting_user_id: i32,
        item_id: i32,
    ) -> Result<(), AppError> {
        let txn = self.db.begin().await.map_err(AppError::Database)?;

        let user = Users::find_by_id(acting_user_id)
            .one(&txn)
            .await
            .map_err(AppError::aborted("load user"))?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let folder = Folders::find_by_id(folder_id)
            .one(&txn)
            .await
            .map_err(AppError::aborted("load folder"))?
            .ok_or_else(|| AppError::NotFound("Folder not found".to_string()))?;

        let item = Items::find_by_id(item_id)
            .one(&txn)
            .await
            .map_err(AppError::aborted("load item"))?
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

        if !AccessPolicy::can_delete_item(&item, user.id) {
            warn!(
                "🚫 User {} tried to delete item {} owned by {}",
                user.id, item.id, item.owner_id
            );
            return Err(AppError::PermissionDenied(
                "Only the user who added an item can delete it".to_string(),
            ));
        }

        let item_id = item.id;
        item.delete(&txn)
            .await
            .map_err(AppError::aborted("delete item"))?;

        txn.commit().await.map_err(AppError::Database)?;

        info!(
            "🗑️ Item {} deleted from folder {} by user {}",
            item_id, folder.id, user.id
        );
        Ok(())
    }
}

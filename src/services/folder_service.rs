use crate::api::error::AppError;
use crate::entities::{prelude::*, *};
use crate::services::access::AccessPolicy;
use crate::utils::validation::{is_blank, validate_url};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct NewFolder {
    pub name: String,
    pub private: bool,
    pub cover_url: Option<String>,
}

/// A folder with its items (oldest first) and contributors.
#[derive(Debug, Clone)]
pub struct FolderDetails {
    pub folder: folders::Model,
    pub items: Vec<items::Model>,
    pub contributors: Vec<users::Model>,
}

pub struct FolderService {
    db: DatabaseConnection,
    feed_limit: u64,
}

/// True when `user_id` is in the folder's contributor set.
pub(crate) async fn is_contributor<C: ConnectionTrait>(
    conn: &C,
    folder_id: i32,
    user_id: i32,
) -> Result<bool, sea_orm::DbErr> {
    let link = FolderContributors::find_by_id((folder_id, user_id))
        .one(conn)
        .await?;
    Ok(link.is_some())
}

/// Reports a private folder as missing to users who may not read it.
/// Mutations call this before their ownership checks.
pub(crate) async fn ensure_visible<C: ConnectionTrait>(
    conn: &C,
    folder: &folders::Model,
    user_id: i32,
) -> Result<(), AppError> {
    let contributor = folder.private && is_contributor(conn, folder.id, user_id).await?;

    if !AccessPolicy::can_view_folder(folder, user_id, contributor) {
        warn!(
            "🚫 User {} denied access to private folder {}",
            user_id, folder.id
        );
        return Err(AppError::NotFound("Folder not found".to_string()));
    }
    Ok(())
}

impl FolderService {
    pub fn new(db: DatabaseConnection, feed_limit: u64) -> Self {
        Self { db, feed_limit }
    }

    /// Creates a folder owned by `owner_id` and appends it to the owner's collection.
    pub async fn create_folder(
        &self,
        owner_id: i32,
        folder: NewFolder,
    ) -> Result<folders::Model, AppError> {
        if is_blank(&folder.name) {
            return Err(AppError::Validation("Folder name must not be blank".to_string()));
        }
        let cover_url = folder
            .cover_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        if let Some(url) = &cover_url {
            validate_url("Cover URL", url)?;
        }

        let txn = self.db.begin().await.map_err(AppError::Database)?;

        let owner = Users::find_by_id(owner_id)
            .one(&txn)
            .await
            .map_err(AppError::aborted("load user"))?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let created = folders::ActiveModel {
            name: Set(folder.name.trim().to_string()),
            owner: Set(owner.id),
            owner_username: Set(owner.username.clone()),
            private: Set(folder.private),
            cover_url: Set(cover_url),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(AppError::aborted("insert folder"))?;

        user_folders::ActiveModel {
            user_id: Set(owner.id),
            folder_id: Set(created.id),
        }
        .insert(&txn)
        .await
        .map_err(AppError::aborted("link folder to owner"))?;

        txn.commit().await.map_err(AppError::Database)?;

        info!("📁 Folder {} created by user {}", created.id, owner.id);
        Ok(created)
    }

    /// Loads a folder with its items and contributors. Existence is the only check.
    pub async fn get_folder(&self, folder_id: i32) -> Result<FolderDetails, AppError> {
        let folder = Folders::find_by_id(folder_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Folder not found".to_string()))?;

        self.load_details(folder).await
    }

    /// Loads a folder on behalf of `viewer_id`. A private folder the viewer may
    /// not read is reported as missing.
    pub async fn get_folder_for(
        &self,
        folder_id: i32,
        viewer_id: i32,
    ) -> Result<FolderDetails, AppError> {
        let folder = Folders::find_by_id(folder_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Folder not found".to_string()))?;

        ensure_visible(&self.db, &folder, viewer_id).await?;

        self.load_details(folder).await
    }

    async fn load_details(&self, folder: folders::Model) -> Result<FolderDetails, AppError> {
        let items = folder
            .find_related(Items)
            .order_by_asc(items::Column::CreatedAt)
            .order_by_asc(items::Column::Id)
            .all(&self.db)
            .await?;

        let contributors = folder
            .find_related(Users)
            .order_by_asc(users::Column::Username)
            .all(&self.db)
            .await?;

        Ok(FolderDetails {
            folder,
            items,
            contributors,
        })
    }

    /// The newest public folders, capped at the configured feed limit.
    pub async fn get_feed(&self) -> Result<Vec<folders::Model>, AppError> {
        let folders = Folders::find()
            .filter(folders::Column::Private.eq(false))
            .order_by_desc(folders::Column::CreatedAt)
            .order_by_desc(folders::Column::Id)
            .limit(self.feed_limit)
            .all(&self.db)
            .await?;
        Ok(folders)
    }

    /// Adds `new_user_id` to the folder's contributors. Adding an existing
    /// contributor again is a no-op.
    pub async fn add_contributor(
        &self,
        folder_id: i32,
        acting_user_id: i32,
        new_user_id: i32,
    ) -> Result<(), AppError> {
        let txn = self.db.begin().await.map_err(AppError::Database)?;

        let folder = Folders::find_by_id(folder_id)
            .one(&txn)
            .await
            .map_err(AppError::aborted("load folder"))?
            .ok_or_else(|| AppError::NotFound("Folder not found".to_string()))?;

        ensure_visible(&txn, &folder, acting_user_id).await?;

        let new_user = Users::find_by_id(new_user_id)
            .one(&txn)
            .await
            .map_err(AppError::aborted("load contributor"))?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !AccessPolicy::can_manage_folder(&folder, acting_user_id) {
            warn!(
                "🚫 User {} tried to add a contributor to folder {} owned by {}",
                acting_user_id, folder.id, folder.owner
            );
            return Err(AppError::PermissionDenied(
                "Only the folder owner can add contributors".to_string(),
            ));
        }

        let already = is_contributor(&txn, folder.id, new_user.id)
            .await
            .map_err(AppError::aborted("check contributor"))?;
        if !already {
            folder_contributors::ActiveModel {
                folder_id: Set(folder.id),
                user_id: Set(new_user.id),
            }
            .insert(&txn)
            .await
            .map_err(AppError::aborted("insert contributor"))?;
        }

        txn.commit().await.map_err(AppError::Database)?;

        info!(
            "🤝 User {} is a contributor of folder {}",
            new_user.id, folder.id
        );
        Ok(())
    }

    /// Deletes a folder owned by `acting_user_id`, removing contributor links,
    /// collection links and items before the folder row, in one transaction.
    pub async fn delete_folder(&self, folder_id: i32, acting_user_id: i32) -> Result<(), AppError> {
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

        ensure_visible(&txn, &folder, user.id).await?;

        if !AccessPolicy::can_manage_folder(&folder, user.id) {
            warn!(
                "🚫 User {} tried to delete folder {} owned by {}",
                user.id, folder.id, folder.owner
            );
            return Err(AppError::PermissionDenied(
                "Only the folder owner can delete it".to_string(),
            ));
        }

        FolderContributors::delete_many()
            .filter(folder_contributors::Column::FolderId.eq(folder.id))
            .exec(&txn)
            .await
            .map_err(AppError::aborted("clear contributors"))?;

        UserFolders::delete_many()
            .filter(user_folders::Column::FolderId.eq(folder.id))
            .exec(&txn)
            .await
            .map_err(AppError::aborted("remove folder from collections"))?;

        let removed = Items::delete_many()
            .filter(items::Column::FolderId.eq(folder.id))
            .exec(&txn)
            .await
            .map_err(AppError::aborted("delete items"))?;

        Folders::delete_by_id(folder.id)
            .exec(&txn)
            .await
            .map_err(AppError::aborted("delete folder"))?;

        txn.commit().await.map_err(AppError::Database)?;

        info!(
            "🗑️ Folder {} deleted by user {} ({} item(s))",
            folder.id, user.id, removed.rows_affected
        );
        Ok(())
    }
}

use crate::api::error::AppError;
use crate::entities::{prelude::*, *};
use crate::utils::auth::{hash_password, verify_dummy_password, verify_password};
use crate::utils::validation::{
    is_blank, normalize_username, password_is_valid, validate_username,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct NewAccount {
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub password: String,
}

/// Result of a successful sign-in.
#[derive(Debug, Clone)]
pub struct SignedInUser {
    pub user: users::Model,
    /// The user's folder collection.
    pub folders: Vec<folders::Model>,
}

pub struct AccountService {
    db: DatabaseConnection,
    default_avatar_url: String,
}

impl AccountService {
    pub fn new(db: DatabaseConnection, default_avatar_url: String) -> Self {
        Self {
            db,
            default_avatar_url,
        }
    }

    pub async fn create_account(&self, account: NewAccount) -> Result<users::Model, AppError> {
        let account = NewAccount {
            username: normalize_username(&account.username),
            email: account.email.trim().to_lowercase(),
            password: account.password,
        };

        if is_blank(&account.username) || is_blank(&account.email) || account.password.is_empty()
        {
            return Err(AppError::Validation("Fields must not be blank".to_string()));
        }
        validate_username(&account.username)?;
        account
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if !password_is_valid(&account.password) {
            return Err(AppError::WeakPassword);
        }

        let taken = Users::find()
            .filter(
                Condition::any()
                    .add(users::Column::Username.eq(&account.username))
                    .add(users::Column::Email.eq(&account.email)),
            )
            .one(&self.db)
            .await?;
        if taken.is_some() {
            return Err(AppError::DuplicateIdentity);
        }

        let password_hash =
            hash_password(&account.password).map_err(|e| AppError::Internal(e.to_string()))?;

        let user = users::ActiveModel {
            email: Set(account.email),
            username: Set(account.username),
            password_hash: Set(password_hash),
            profile_picture: Set(Some(self.default_avatar_url.clone())),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from_insert)?;

        info!("👤 Account created: {} (id {})", user.username, user.id);
        Ok(user)
    }

    /// Never reveals whether the username or the password was wrong.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<SignedInUser, AppError> {
        let Some(user) = Users::find()
            .filter(users::Column::Username.eq(normalize_username(username)))
            .one(&self.db)
            .await?
        else {
            verify_dummy_password(password);
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(&user.password_hash, password) {
            return Err(AppError::InvalidCredentials);
        }

        let folders = user
            .find_related(Folders)
            .order_by_desc(folders::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(SignedInUser { user, folders })
    }

    pub async fn get_user(&self, user_id: i32) -> Result<users::Model, AppError> {
        Users::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Folders owned by `user_id`, newest first.
    pub async fn get_user_folders(&self, user_id: i32) -> Result<Vec<folders::Model>, AppError> {
        let folders = Folders::find()
            .filter(folders::Column::Owner.eq(user_id))
            .order_by_desc(folders::Column::CreatedAt)
            .order_by_desc(folders::Column::Id)
            .all(&self.db)
            .await?;
        Ok(folders)
    }

    pub async fn update_password(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if current_password.is_empty() || new_password.is_empty() {
            return Err(AppError::Validation("Fields must not be blank".to_string()));
        }

        let user = self.get_user(user_id).await?;

        if !password_is_valid(new_password) {
            return Err(AppError::WeakPassword);
        }
        if !verify_password(&user.password_hash, current_password) {
            return Err(AppError::InvalidCredentials);
        }
        if new_password == current_password {
            return Err(AppError::SamePassword);
        }

        let password_hash =
            hash_password(new_password).map_err(|e| AppError::Internal(e.to_string()))?;

        let mut active = user.into_active_model();
        active.password_hash = Set(password_hash);
        active.update(&self.db).await?;

        info!("🔑 Password updated for user {}", user_id);
        Ok(())
    }

    /// Removes the account and everything that references it, children first,
    /// in one transaction.
    pub async fn delete_account(&self, user_id: i32) -> Result<(), AppError> {
        let txn = self.db.begin().await.map_err(AppError::Database)?;

        let user = Users::find_by_id(user_id)
            .one(&txn)
            .await
            .map_err(AppError::aborted("load user"))?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let owned: Vec<i32> = Folders::find()
            .select_only()
            .column(folders::Column::Id)
            .filter(folders::Column::Owner.eq(user_id))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(AppError::aborted("list owned folders"))?;

        Sessions::delete_many()
            .filter(sessions::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(AppError::aborted("delete sessions"))?;

        FolderContributors::delete_many()
            .filter(
                Condition::any()
                    .add(folder_contributors::Column::FolderId.is_in(owned.clone()))
                    .add(folder_contributors::Column::UserId.eq(user_id)),
            )
            .exec(&txn)
            .await
            .map_err(AppError::aborted("delete contributor links"))?;

        UserFolders::delete_many()
            .filter(
                Condition::any()
                    .add(user_folders::Column::FolderId.is_in(owned.clone()))
                    .add(user_folders::Column::UserId.eq(user_id)),
            )
            .exec(&txn)
            .await
            .map_err(AppError::aborted("delete folder memberships"))?;

        // Items in the user's folders, whoever added them, and the user's items elsewhere.
        Items::delete_many()
            .filter(
                Condition::any()
                    .add(items::Column::FolderId.is_in(owned.clone()))
                    .add(items::Column::OwnerId.eq(user_id)),
            )
            .exec(&txn)
            .await
            .map_err(AppError::aborted("delete items"))?;

        Folders::delete_many()
            .filter(folders::Column::Owner.eq(user_id))
            .exec(&txn)
            .await
            .map_err(AppError::aborted("delete folders"))?;

        user.delete(&txn)
            .await
            .map_err(AppError::aborted("delete user"))?;

        txn.commit().await.map_err(AppError::Database)?;

        info!(
            "🗑️ Account {} deleted along with {} folder(s)",
            user_id,
            owned.len()
        );
        Ok(())
    }
}

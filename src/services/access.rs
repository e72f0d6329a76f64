//! Authorization rules for folders and items.
//!
//! Folder ownership and item ownership are separate axes: folder-level
//! mutations (delete, contributor management) are gated on `folders.owner`,
//! item deletion on `items.owner_id`.

use crate::config::AppConfig;
use crate::entities::{folders, items};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Whether contributors may add items to a folder they do not own.
    pub contributors_can_add_items: bool,
}

impl AccessPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            contributors_can_add_items: config.contributors_can_add_items,
        }
    }

    pub fn is_owner(folder: &folders::Model, user_id: i32) -> bool {
        folder.owner == user_id
    }

    /// Deleting a folder and managing its contributors is reserved to the owner.
    pub fn can_manage_folder(folder: &folders::Model, user_id: i32) -> bool {
        Self::is_owner(folder, user_id)
    }

    pub fn can_add_item(&self, folder: &folders::Model, user_id: i32, is_contributor: bool) -> bool {
        Self::is_owner(folder, user_id) || (self.contributors_can_add_items && is_contributor)
    }

    /// Only the user who added an item may delete it, whoever owns the folder.
    pub fn can_delete_item(item: &items::Model, user_id: i32) -> bool {
        item.owner_id == user_id
    }

    /// Public folders are readable by everyone; private ones by owner and contributors.
    pub fn can_view_folder(folder: &folders::Model, user_id: i32, is_contributor: bool) -> bool {
        !folder.private || Self::is_owner(folder, user_id) || is_contributor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn folder(owner: i32, private: bool) -> folders::Model {
        folders::Model {
            id: 1,
            name: "Reading list".to_string(),
            owner,
            owner_username: "alice".to_string(),
            private,
            cover_url: None,
            created_at: Utc::now(),
        }
    }

    fn item(owner_id: i32) -> items::Model {
        items::Model {
            id: 1,
            name: "Rust book".to_string(),
            url: "https://doc.rust-lang.org/book/".to_string(),
            folder_id: 1,
            owner_id,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_only_owner_manages_folder() {
        let f = folder(1, false);
        assert!(AccessPolicy::can_manage_folder(&f, 1));
        assert!(!AccessPolicy::can_manage_folder(&f, 2));
    }

    #[test]
    fn test_add_item_policy() {
        let f = folder(1, false);
        let strict = AccessPolicy::default();
        assert!(strict.can_add_item(&f, 1, false));
        assert!(!strict.can_add_item(&f, 2, true));
        assert!(!strict.can_add_item(&f, 2, false));

        let open = AccessPolicy {
            contributors_can_add_items: true,
        };
        assert!(open.can_add_item(&f, 2, true));
        assert!(!open.can_add_item(&f, 3, false));
    }

    #[test]
    fn test_item_deletion_follows_item_owner() {
        // Folder owner 1, item added by 2
        let i = item(2);
        assert!(AccessPolicy::can_delete_item(&i, 2));
        assert!(!AccessPolicy::can_delete_item(&i, 1));
    }

    #[test]
    fn test_private_folder_visibility() {
        let public = folder(1, false);
        let private = folder(1, true);
        assert!(AccessPolicy::can_view_folder(&public, 9, false));
        assert!(AccessPolicy::can_view_folder(&private, 1, false));
        assert!(AccessPolicy::can_view_folder(&private, 2, true));
        assert!(!AccessPolicy::can_view_folder(&private, 9, false));
    }
}

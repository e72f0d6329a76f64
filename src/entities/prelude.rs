pub use super::folder_contributors::Entity as FolderContributors;
pub use super::folders::Entity as Folders;
pub use super::items::Entity as Items;
pub use super::sessions::Entity as Sessions;
pub use super::user_folders::Entity as UserFolders;
pub use super::users::Entity as Users;

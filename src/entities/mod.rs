pub mod prelude;

pub mod folder_contributors;
pub mod folders;
pub mod items;
pub mod sessions;
pub mod user_folders;
pub mod users;

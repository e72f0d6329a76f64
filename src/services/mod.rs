pub mod access;
pub mod account_service;
pub mod folder_service;
pub mod item_service;
pub mod session;

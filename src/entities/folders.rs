use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "folders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Authoritative owner; every folder-level permission check compares against this.
    pub owner: i32,
    /// Snapshot of the owner's username taken when the folder was created.
    pub owner_username: String,
    pub private: bool,
    pub cover_url: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::Owner",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Owner,
    #[sea_orm(has_many = "super::items::Entity")]
    Items,
}

impl Related<super::items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

/// Contributors, kept in the `folder_contributors` link table.
impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        super::folder_contributors::Relation::Users.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::folder_contributors::Relation::Folders.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! 图书馆资料（往年试卷）实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "library_resources")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub subject: String,
    pub year: i32,
    pub file_token: String,
    pub uploaded_by: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::files::Entity",
        from = "Column::FileToken",
        to = "super::files::Column::DownloadToken"
    )]
    File,
}

impl Related<super::files::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::File.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_resource(self) -> crate::models::library::entities::LibraryResource {
        use crate::models::library::entities::LibraryResource;
        use chrono::{DateTime, Utc};

        LibraryResource {
            id: self.id,
            title: self.title,
            subject: self.subject,
            year: self.year,
            file_token: self.file_token,
            uploaded_by: self.uploaded_by,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}

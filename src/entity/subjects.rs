//! 科目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subjects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub code: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::classroom_subjects::Entity")]
    ClassroomSubjects,
}

impl Related<super::classroom_subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassroomSubjects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_subject(self) -> crate::models::academic::entities::Subject {
        crate::models::academic::entities::Subject {
            id: self.id,
            name: self.name,
            code: self.code,
            description: self.description,
        }
    }
}

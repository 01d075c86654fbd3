//! 班级实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "classrooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub section: Option<String>,
    pub academic_year: String,
    pub class_teacher_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ClassTeacherId",
        to = "super::users::Column::Id"
    )]
    ClassTeacher,
    #[sea_orm(has_many = "super::classroom_subjects::Entity")]
    ClassroomSubjects,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassTeacher.def()
    }
}

impl Related<super::classroom_subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassroomSubjects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_classroom(self) -> crate::models::academic::entities::Classroom {
        use crate::models::academic::entities::Classroom;
        use chrono::{DateTime, Utc};

        Classroom {
            id: self.id,
            name: self.name,
            section: self.section,
            academic_year: self.academic_year,
            class_teacher_id: self.class_teacher_id,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}

//! 用户资料实体（各角色字段的并集）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub relation_to_student: Option<String>,
    pub guardian_phone: Option<String>,
    pub classroom_id: Option<i64>,
    pub avatar_token: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::classrooms::Entity",
        from = "Column::ClassroomId",
        to = "super::classrooms::Column::Id"
    )]
    Classroom,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::classrooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classroom.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_record(self) -> crate::models::profiles::entities::ProfileRecord {
        use crate::models::profiles::entities::{Gender, ProfileRecord};
        use chrono::{DateTime, Utc};

        ProfileRecord {
            user_id: self.user_id,
            address: self.address,
            phone_number: self.phone_number,
            gender: self.gender.and_then(|g| g.parse::<Gender>().ok()),
            department: self.department,
            position: self.position,
            relation_to_student: self.relation_to_student,
            guardian_phone: self.guardian_phone,
            classroom_id: self.classroom_id,
            avatar_token: self.avatar_token,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}

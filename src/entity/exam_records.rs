//! 成绩记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exam_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub classroom_id: i64,
    pub section: Option<String>,
    pub subject_id: i64,
    pub student_id: i64,
    pub exam_type_id: i64,
    pub score: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub date_recorded: Date,
    pub grade_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::grade_scales::Entity",
        from = "Column::GradeId",
        to = "super::grade_scales::Column::Id"
    )]
    Grade,
}

impl Related<super::grade_scales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grade.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_exam_record(self) -> crate::models::grading::entities::ExamRecord {
        use crate::models::grading::entities::ExamRecord;
        use chrono::{DateTime, Utc};

        ExamRecord {
            id: self.id,
            classroom_id: self.classroom_id,
            section: self.section,
            subject_id: self.subject_id,
            student_id: self.student_id,
            exam_type_id: self.exam_type_id,
            score: self.score,
            comment: self.comment,
            date_recorded: self.date_recorded,
            grade_id: self.grade_id,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}

//! 等级区间实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grade_scales")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub score_from: f64,
    pub score_to: f64,
    pub comment: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_grade_scale(self) -> crate::models::grading::entities::GradeScale {
        crate::models::grading::entities::GradeScale {
            id: self.id,
            name: self.name,
            score_from: self.score_from,
            score_to: self.score_to,
            comment: self.comment,
        }
    }
}

//! 借阅记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "borrowed_books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub book_id: i64,
    pub issue_date: Date,
    pub return_date: Date,
    pub actual_return_date: Option<Date>,
    pub returned: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::books::Entity",
        from = "Column::BookId",
        to = "super::books::Column::Id"
    )]
    Book,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
}

impl Related<super::books::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_borrowed_book(self) -> crate::models::library::entities::BorrowedBook {
        crate::models::library::entities::BorrowedBook {
            id: self.id,
            student_id: self.student_id,
            book_id: self.book_id,
            issue_date: self.issue_date,
            return_date: self.return_date,
            actual_return_date: self.actual_return_date,
            returned: self.returned,
        }
    }
}

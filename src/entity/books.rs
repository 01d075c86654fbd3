//! 图书实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub category_id: Option<i64>,
    pub price: f64,
    pub total_copies: i32,
    pub available_copies: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book_categories::Entity",
        from = "Column::CategoryId",
        to = "super::book_categories::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::borrowed_books::Entity")]
    Loans,
}

impl Related<super::book_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::borrowed_books::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loans.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_book(self) -> crate::models::library::entities::Book {
        use crate::models::library::entities::Book;
        use chrono::{DateTime, Utc};

        Book {
            id: self.id,
            title: self.title,
            author: self.author,
            isbn: self.isbn,
            category_id: self.category_id,
            price: self.price,
            total_copies: self.total_copies,
            available_copies: self.available_copies,
            description: self.description,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}

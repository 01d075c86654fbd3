use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct BookCategory {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

// 图书，0 <= available_copies <= total_copies
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub category_id: Option<i64>,
    pub price: f64,
    pub total_copies: i32,
    pub available_copies: i32,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 借阅记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct BorrowedBook {
    pub id: i64,
    pub student_id: i64,
    pub book_id: i64,
    pub issue_date: chrono::NaiveDate,
    /// 应还日期
    pub return_date: chrono::NaiveDate,
    pub actual_return_date: Option<chrono::NaiveDate>,
    pub returned: bool,
}

// 往年试卷等资料
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct LibraryResource {
    pub id: i64,
    pub title: String,
    pub subject: String,
    pub year: i32,
    pub file_token: String,
    pub uploaded_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

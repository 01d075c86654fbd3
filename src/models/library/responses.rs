use serde::Serialize;
use ts_rs::TS;

use super::entities::{Book, BookCategory, BorrowedBook, LibraryResource};
use super::fine::OverdueStatus;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct BookCategoryListResponse {
    pub items: Vec<BookCategory>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct BookListResponse {
    pub items: Vec<Book>,
    pub pagination: PaginationInfo,
}

// 借阅记录及书名、学生姓名（存储层查询结果）
#[derive(Debug, Clone)]
pub struct LoanDetails {
    pub loan: BorrowedBook,
    pub book_title: String,
    pub student_name: String,
}

// 对外返回的借阅记录，附带逾期和罚金
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct LoanView {
    #[serde(flatten)]
    #[ts(flatten)]
    pub loan: BorrowedBook,
    pub book_title: String,
    pub student_name: String,
    #[serde(flatten)]
    #[ts(flatten)]
    pub overdue: OverdueStatus,
}

impl LoanDetails {
    pub fn into_view(self, today: chrono::NaiveDate, fine_per_day: f64) -> LoanView {
        let overdue = self.loan.overdue_status(today, fine_per_day);
        LoanView {
            loan: self.loan,
            book_title: self.book_title,
            student_name: self.student_name,
            overdue,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct LoanListResponse {
    pub items: Vec<LoanView>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct LibraryResourceListResponse {
    pub items: Vec<LibraryResource>,
}

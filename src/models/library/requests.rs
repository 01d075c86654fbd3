use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct CreateBookCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub category_id: Option<i64>,
    #[serde(default)]
    pub price: f64,
    pub total_copies: i32,
    pub description: Option<String>,
}

impl CreateBookRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("Book title is required");
        }
        if self.author.trim().is_empty() {
            return Err("Book author is required");
        }
        if self.total_copies < 0 {
            return Err("total_copies must not be negative");
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err("price must not be negative");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub category_id: Option<i64>,
    pub price: Option<f64>,
    /// 修改总量时可借数量同步增减
    pub total_copies: Option<i32>,
    pub description: Option<String>,
}

impl UpdateBookRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(total) = self.total_copies
            && total < 0
        {
            return Err("total_copies must not be negative");
        }
        if let Some(price) = self.price
            && (!price.is_finite() || price < 0.0)
        {
            return Err("price must not be negative");
        }
        Ok(())
    }
}

// 图书列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct BookListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub category_id: Option<i64>,
    pub search: Option<String>,
}

// 图书列表查询参数（存储层）
#[derive(Debug, Clone, Default)]
pub struct BookListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub category_id: Option<i64>,
    pub search: Option<String>,
}

/// 借书
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct BorrowBookRequest {
    pub student_id: i64,
    pub book_id: i64,
    /// 缺省为当天
    pub issue_date: Option<chrono::NaiveDate>,
    /// 缺省为借出日加默认借期
    pub return_date: Option<chrono::NaiveDate>,
}

// 已校验、补全日期后的借书参数
#[derive(Debug, Clone, Copy)]
pub struct NewLoan {
    pub student_id: i64,
    pub book_id: i64,
    pub issue_date: chrono::NaiveDate,
    pub return_date: chrono::NaiveDate,
}

impl BorrowBookRequest {
    pub fn into_loan(
        self,
        today: chrono::NaiveDate,
        default_loan_days: i64,
    ) -> Result<NewLoan, &'static str> {
        let issue_date = self.issue_date.unwrap_or(today);
        let return_date = match self.return_date {
            Some(date) => date,
            None => chrono::TimeDelta::try_days(default_loan_days)
                .and_then(|period| issue_date.checked_add_signed(period))
                .ok_or("issue_date is out of range")?,
        };
        if return_date < issue_date {
            return Err("return_date must not be before issue_date");
        }
        Ok(NewLoan {
            student_id: self.student_id,
            book_id: self.book_id,
            issue_date,
            return_date,
        })
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct CreateLibraryResourceRequest {
    pub title: String,
    pub subject: String,
    pub year: i32,
    pub file_token: String,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct LibraryResourceListParams {
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub year: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_loan_dates_default() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let loan = BorrowBookRequest {
            student_id: 1,
            book_id: 2,
            issue_date: None,
            return_date: None,
        }
        .into_loan(today, 14)
        .unwrap();
        assert_eq!(loan.issue_date, today);
        assert_eq!(loan.return_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_issue_date_at_calendar_end_rejected() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let result = BorrowBookRequest {
            student_id: 1,
            book_id: 2,
            issue_date: Some(NaiveDate::MAX),
            return_date: None,
        }
        .into_loan(today, 14);
        assert_eq!(result.unwrap_err(), "issue_date is out of range");

        let result = BorrowBookRequest {
            student_id: 1,
            book_id: 2,
            issue_date: None,
            return_date: None,
        }
        .into_loan(today, i64::MAX);
        assert!(result.is_err());
    }

    #[test]
    fn test_return_before_issue_rejected() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let result = BorrowBookRequest {
            student_id: 1,
            book_id: 2,
            issue_date: None,
            return_date: NaiveDate::from_ymd_opt(2024, 1, 9),
        }
        .into_loan(today, 14);
        assert!(result.is_err());
    }

    #[test]
    fn test_book_validation() {
        let mut req = CreateBookRequest {
            title: "Things Fall Apart".to_string(),
            author: "Chinua Achebe".to_string(),
            isbn: None,
            category_id: None,
            price: 0.0,
            total_copies: -1,
            description: None,
        };
        assert!(req.validate().is_err());
        req.total_copies = 3;
        assert!(req.validate().is_ok());
    }
}

//! 逾期与罚金计算
//!
//! 纯函数，罚金费率由调用方从配置中传入。

use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

use super::entities::BorrowedBook;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct OverdueStatus {
    pub is_overdue: bool,
    pub overdue_days: i64,
    pub fine: f64,
}

impl BorrowedBook {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.actual_return_date {
            Some(actual) if self.returned => actual > self.return_date,
            _ => !self.returned && today > self.return_date,
        }
    }

    /// 已归还按实际归还日计算，未归还按今天计算
    pub fn overdue_days(&self, today: NaiveDate) -> i64 {
        let end = match self.actual_return_date {
            Some(actual) if self.returned => actual,
            _ => today,
        };
        (end - self.return_date).num_days().max(0)
    }

    pub fn fine(&self, today: NaiveDate, fine_per_day: f64) -> f64 {
        self.overdue_days(today) as f64 * fine_per_day
    }

    pub fn overdue_status(&self, today: NaiveDate, fine_per_day: f64) -> OverdueStatus {
        OverdueStatus {
            is_overdue: self.is_overdue(today),
            overdue_days: self.overdue_days(today),
            fine: self.fine(today, fine_per_day),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loan(actual: Option<NaiveDate>) -> BorrowedBook {
        BorrowedBook {
            id: 1,
            student_id: 1,
            book_id: 1,
            issue_date: date(2024, 1, 1),
            return_date: date(2024, 1, 10),
            actual_return_date: actual,
            returned: actual.is_some(),
        }
    }

    #[test]
    fn test_late_return_charges_per_day() {
        let returned = loan(Some(date(2024, 1, 15)));
        // 归还之后的“今天”不影响结果
        let status = returned.overdue_status(date(2024, 6, 1), 10.0);
        assert!(status.is_overdue);
        assert_eq!(status.overdue_days, 5);
        assert_eq!(status.fine, 50.0);
        assert_eq!(returned.fine(date(2024, 6, 1), 2.5), 12.5);
    }

    #[test]
    fn test_on_time_return() {
        let returned = loan(Some(date(2024, 1, 10)));
        let status = returned.overdue_status(date(2024, 2, 1), 10.0);
        assert!(!status.is_overdue);
        assert_eq!(status.overdue_days, 0);
        assert_eq!(status.fine, 0.0);
    }

    #[test]
    fn test_outstanding_loan_uses_today() {
        let open = loan(None);
        assert!(!open.is_overdue(date(2024, 1, 10)));
        assert_eq!(open.overdue_days(date(2024, 1, 5)), 0);

        let status = open.overdue_status(date(2024, 1, 13), 10.0);
        assert!(status.is_overdue);
        assert_eq!(status.overdue_days, 3);
        assert_eq!(status.fine, 30.0);
    }
}

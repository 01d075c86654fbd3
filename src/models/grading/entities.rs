use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 考试类型（期中、期末……）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "grading.ts")]
pub struct ExamType {
    pub id: i64,
    pub name: String,
}

// 等级区间，score_from 和 score_to 都是闭区间
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "grading.ts")]
pub struct GradeScale {
    pub id: i64,
    pub name: String,
    pub score_from: f64,
    pub score_to: f64,
    pub comment: String,
}

impl GradeScale {
    pub fn contains(&self, score: f64) -> bool {
        self.score_from <= score && score <= self.score_to
    }
}

// 成绩记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "grading.ts")]
pub struct ExamRecord {
    pub id: i64,
    pub classroom_id: i64,
    pub section: Option<String>,
    pub subject_id: i64,
    pub student_id: i64,
    pub exam_type_id: i64,
    pub score: f64,
    pub comment: Option<String>,
    pub date_recorded: chrono::NaiveDate,
    pub grade_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

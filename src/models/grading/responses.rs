use serde::Serialize;
use ts_rs::TS;

use super::entities::{ExamRecord, ExamType, GradeScale};
use crate::models::academic::entities::Subject;
use crate::models::common::PaginationInfo;
use crate::models::users::entities::UserSummary;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "grading.ts")]
pub struct ExamTypeListResponse {
    pub items: Vec<ExamType>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "grading.ts")]
pub struct GradeScaleListResponse {
    pub items: Vec<GradeScale>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "grading.ts")]
pub struct ResolvedGradeResponse {
    pub score: f64,
    pub grade: Option<GradeScale>,
}

// 成绩记录及其派生字段
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "grading.ts")]
pub struct ExamRecordView {
    #[serde(flatten)]
    #[ts(flatten)]
    pub record: ExamRecord,
    pub student_name: String,
    pub subject_name: String,
    pub exam_type_name: String,
    pub grade_name: Option<String>,
    pub grade_comment: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "grading.ts")]
pub struct ExamRecordListResponse {
    pub items: Vec<ExamRecordView>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "grading.ts")]
pub struct ClassroomStudentListResponse {
    pub classroom_id: i64,
    pub items: Vec<UserSummary>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "grading.ts")]
pub struct StudentSubjectListResponse {
    pub student_id: i64,
    pub items: Vec<Subject>,
}

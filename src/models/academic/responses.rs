use serde::Serialize;
use ts_rs::TS;

use super::entities::{Classroom, ClassroomSubject, Enrollment, Subject};
use crate::models::common::PaginationInfo;
use crate::models::users::entities::UserSummary;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct ClassroomListResponse {
    pub items: Vec<Classroom>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct ClassroomDetailsResponse {
    pub classroom: Classroom,
    pub students: Vec<UserSummary>,
    pub subjects: Vec<ClassroomSubject>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct SubjectListResponse {
    pub items: Vec<Subject>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct ClassroomSubjectListResponse {
    pub classroom_id: i64,
    pub items: Vec<ClassroomSubject>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct AssignSubjectResponse {
    pub assignment: ClassroomSubject,
    /// false 表示覆盖了已有分配
    pub created: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct EnrollmentResponse {
    pub enrollment: Enrollment,
    pub subjects_assigned: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct EnrollmentListResponse {
    pub items: Vec<Enrollment>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct StudentSubjectsResponse {
    pub student_id: i64,
    pub classroom_id: Option<i64>,
    /// 学生没有单独的科目记录，返回的是所在班级的科目
    pub from_classroom: bool,
    pub subjects: Vec<Subject>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct ClassroomStudentsResponse {
    pub classroom_id: i64,
    pub students: Vec<UserSummary>,
}

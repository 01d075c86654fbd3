use serde::Serialize;
use ts_rs::TS;

use super::entities::Attendance;
use crate::models::common::PaginationInfo;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceView {
    #[serde(flatten)]
    #[ts(flatten)]
    pub attendance: Attendance,
    pub user_name: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceListResponse {
    pub items: Vec<AttendanceView>,
    pub pagination: PaginationInfo,
}

use serde::Deserialize;
use ts_rs::TS;

use super::entities::AttendanceStatus;
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::models::users::entities::UserRole;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct CreateAttendanceRequest {
    pub user_id: i64,
    pub classroom_id: Option<i64>,
    /// 缺省为当天
    pub date: Option<chrono::NaiveDate>,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct UpdateAttendanceRequest {
    pub status: Option<AttendanceStatus>,
    pub remarks: Option<String>,
}

// 考勤列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub user_type: Option<UserRole>,
    pub date: Option<chrono::NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub classroom_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub user_id: Option<i64>,
}

// 考勤列表查询参数（存储层）
#[derive(Debug, Clone, Default)]
pub struct AttendanceListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub user_type: Option<UserRole>,
    pub date: Option<chrono::NaiveDate>,
    pub classroom_id: Option<i64>,
    pub user_id: Option<i64>,
}

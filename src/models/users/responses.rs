use super::entities::{User, UserRole, UserSummary};
use crate::models::common::PaginationInfo;
use crate::models::profiles::entities::Profile;
use serde::Serialize;
use ts_rs::TS;

// 用户响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UserResponse {
    pub user: User,
}

// 用户列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UserListResponse {
    pub items: Vec<User>,
    pub pagination: PaginationInfo,
}

// 按角色列出的用户
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UserSummaryListResponse {
    pub role: Option<UserRole>,
    pub items: Vec<UserSummary>,
}

// 单个角色的人数
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct RoleCount {
    pub role: UserRole,
    pub count: i64,
}

// 各角色人数统计
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct RoleCountResponse {
    pub total: i64,
    pub counts: Vec<RoleCount>,
}

// 注册学生的结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct RegisteredStudentResponse {
    pub user: User,
    pub profile: Option<Profile>,
    pub subjects_assigned: i64,
}

//! 数据模型定义
//!
//! 每个业务域分为 entities（业务实体）、requests（请求体/查询参数）、responses（响应体）。

pub mod academic;
pub mod announcements;
pub mod attendance;
pub mod auth;
pub mod common;
pub mod files;
pub mod grading;
pub mod library;
pub mod profiles;
pub mod users;

pub use common::{ApiResponse, AppStartTime, ErrorCode, PaginatedResponse, PaginationInfo};

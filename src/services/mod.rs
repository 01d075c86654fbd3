//! 业务服务层
//!
//! 每个业务域一个 `XService`，具体操作拆在子模块里；
//! 这里放各服务共用的依赖获取和错误到 HTTP 响应的映射。

pub mod academic;
pub mod announcements;
pub mod attendance;
pub mod auth;
pub mod files;
pub mod grading;
pub mod library;
pub mod profiles;
pub mod users;

pub use academic::AcademicService;
pub use announcements::AnnouncementService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use files::FileService;
pub use grading::GradingService;
pub use library::LibraryService;
pub use profiles::ProfileService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, error::ErrorInternalServerError, http::StatusCode, web};
use std::sync::Arc;
use tracing::error;

use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::errors::SchoolError;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub(crate) fn storage_from(request: &HttpRequest) -> actix_web::Result<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| ErrorInternalServerError("Storage not found in app data"))
}

pub(crate) fn cache_from(request: &HttpRequest) -> actix_web::Result<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| ErrorInternalServerError("Cache not found in app data"))
}

pub(crate) fn config_from(request: &HttpRequest) -> actix_web::Result<web::Data<AppConfig>> {
    request
        .app_data::<web::Data<AppConfig>>()
        .cloned()
        .ok_or_else(|| ErrorInternalServerError("Config not found in app data"))
}

/// 服务器当地日期
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

/// 当前登录用户；RequireJWT 之后一定存在
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

fn status_of(err: &SchoolError) -> StatusCode {
    match err {
        SchoolError::Validation(_) | SchoolError::InvalidState(_) | SchoolError::DateParse(_) => {
            StatusCode::BAD_REQUEST
        }
        SchoolError::NotFound(_) => StatusCode::NOT_FOUND,
        SchoolError::Conflict(_) | SchoolError::StaleData(_) => StatusCode::CONFLICT,
        SchoolError::Authentication(_) => StatusCode::UNAUTHORIZED,
        SchoolError::Authorization(_) => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn default_code(err: &SchoolError) -> ErrorCode {
    match err {
        SchoolError::NotFound(_) => ErrorCode::NotFound,
        SchoolError::Conflict(_) => ErrorCode::Conflict,
        SchoolError::StaleData(_) => ErrorCode::StockConflict,
        SchoolError::Authentication(_) => ErrorCode::Unauthorized,
        SchoolError::Authorization(_) => ErrorCode::Forbidden,
        _ => ErrorCode::BadRequest,
    }
}

/// 把业务错误转换成统一响应；内部错误只记录日志，不把细节返回给客户端
pub(crate) fn error_response(err: &SchoolError) -> HttpResponse {
    error_response_coded(err, default_code(err))
}

/// 同上，但 4xx 使用调用方给定的业务错误码
pub(crate) fn error_response_coded(err: &SchoolError, code: ErrorCode) -> HttpResponse {
    let status = status_of(err);
    if status.is_server_error() {
        error!("{}", err);
        return HttpResponse::build(status).json(ApiResponse::error_empty(
            ErrorCode::InternalServerError,
            "Internal server error",
        ));
    }
    HttpResponse::build(status).json(ApiResponse::error_empty(code, err.message()))
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn forbidden(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            status_of(&SchoolError::validation("bad")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(&SchoolError::invalid_state("returned")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(&SchoolError::conflict("dup")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(&SchoolError::stale_data("stock")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(&SchoolError::not_found("missing")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(&SchoolError::database_operation("boom")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let res = error_response(&SchoolError::database_operation("secret table name"));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let res = error_response_coded(&SchoolError::conflict("dup"), ErrorCode::BookAlreadyBorrowed);
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }
}

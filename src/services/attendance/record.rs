use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AttendanceService;
use crate::errors::SchoolError;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::requests::{CreateAttendanceRequest, UpdateAttendanceRequest},
};
use crate::services::{
    current_user, error_response, error_response_coded, forbidden, not_found, today,
};

pub async fn create_attendance(
    service: &AttendanceService,
    body: CreateAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    match storage.create_attendance(body, me.id, today()).await {
        Ok(view) => {
            info!(
                "{} 登记考勤: 用户 {} {} {}",
                me.id, view.attendance.user_id, view.attendance.date, view.attendance.status
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                view,
                "Attendance recorded successfully",
            )))
        }
        Err(e @ SchoolError::Validation(_)) => {
            Ok(error_response_coded(&e, ErrorCode::AttendanceDuplicate))
        }
        Err(e @ SchoolError::NotFound(_)) => Ok(error_response_coded(&e, ErrorCode::UserNotFound)),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_attendance(
    service: &AttendanceService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    match storage.get_attendance(id).await {
        Ok(Some(view)) if view.attendance.user_id != me.id && !me.role.is_teaching() => {
            Ok(forbidden("You can only view your own attendance"))
        }
        Ok(Some(view)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            view,
            "Attendance retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::AttendanceNotFound, "Attendance not found")),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn update_attendance(
    service: &AttendanceService,
    id: i64,
    body: UpdateAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.update_attendance(id, body).await {
        Ok(Some(view)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            view,
            "Attendance updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::AttendanceNotFound, "Attendance not found")),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn delete_attendance(
    service: &AttendanceService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_attendance(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Attendance deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::AttendanceNotFound, "Attendance not found")),
        Err(e) => Ok(error_response(&e)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::models::{
    ApiResponse,
    attendance::requests::{AttendanceListParams, AttendanceListQuery},
    common::PaginationQuery,
};
use crate::services::{current_user, error_response};

pub async fn list_attendance(
    service: &AttendanceService,
    query: AttendanceListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = AttendanceListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        user_type: query.user_type,
        date: query.date,
        classroom_id: query.classroom_id,
        user_id: query.user_id,
    };

    match storage.list_attendance_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Attendance retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn list_my_attendance(
    service: &AttendanceService,
    pagination: PaginationQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let list_query = AttendanceListQuery {
        page: Some(pagination.page),
        size: Some(pagination.size),
        user_id: Some(me.id),
        ..Default::default()
    };

    match storage.list_attendance_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Attendance retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

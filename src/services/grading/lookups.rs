use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradingService;
use crate::models::{
    ApiResponse, ErrorCode,
    grading::responses::{ClassroomStudentListResponse, StudentSubjectListResponse},
    users::entities::{UserRole, UserSummary},
};
use crate::services::{error_response, not_found};

pub async fn classroom_students(
    service: &GradingService,
    classroom_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_classroom_by_id(classroom_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::ClassroomNotFound, "Classroom not found")),
        Err(e) => return Ok(error_response(&e)),
    }

    match storage.list_classroom_students(classroom_id).await {
        Ok(users) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassroomStudentListResponse {
                classroom_id,
                items: users.iter().map(UserSummary::from).collect(),
            },
            "Students retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn student_subjects(
    service: &GradingService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_user_by_id(student_id).await {
        Ok(Some(user)) if user.role == UserRole::Student => {}
        Ok(_) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(error_response(&e)),
    }

    match storage.list_student_subjects(student_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentSubjectListResponse {
                student_id,
                items: response.subjects,
            },
            "Subjects retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

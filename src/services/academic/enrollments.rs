use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AcademicService;
use crate::errors::SchoolError;
use crate::models::{
    ApiResponse, ErrorCode,
    academic::{
        requests::{EnrollStudentRequest, EnrollmentListParams},
        responses::{EnrollmentListResponse, EnrollmentResponse},
    },
    users::entities::UserRole,
};
use crate::services::{bad_request, current_user, error_response, error_response_coded, not_found};

pub async fn enroll_student(
    service: &AcademicService,
    body: EnrollStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (Some(student_id), Some(classroom_id)) = (body.student_id, body.classroom_id) else {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "student_id and classroom_id are required",
        ));
    };
    let storage = service.get_storage(request)?;

    match storage.enroll_student(student_id, classroom_id).await {
        Ok((enrollment, subjects_assigned)) => {
            info!(
                "学生 {} 加入班级 {}，同步科目 {} 门",
                student_id, classroom_id, subjects_assigned
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                EnrollmentResponse {
                    enrollment,
                    subjects_assigned,
                },
                "Student enrolled successfully",
            )))
        }
        Err(e @ SchoolError::Validation(_)) => {
            Ok(error_response_coded(&e, ErrorCode::AlreadyEnrolled))
        }
        Err(e @ SchoolError::NotFound(_)) => {
            let code = if e.message().starts_with("Student") {
                ErrorCode::StudentNotFound
            } else {
                ErrorCode::ClassroomNotFound
            };
            Ok(error_response_coded(&e, code))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn list_enrollments(
    service: &AcademicService,
    query: EnrollmentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_enrollments(query).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            EnrollmentListResponse { items },
            "Enrollments retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn my_subjects(
    service: &AcademicService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    if me.role != UserRole::Student {
        return Ok(not_found(ErrorCode::StudentNotFound, "Student profile not found"));
    }
    subjects_of(service, me.id, request).await
}

pub async fn student_subjects(
    service: &AcademicService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.get_user_by_id(student_id).await {
        Ok(Some(user)) if user.role == UserRole::Student => {}
        Ok(_) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(error_response(&e)),
    }
    subjects_of(service, student_id, request).await
}

/// 学生自己的科目；没有单独记录时退回到班级科目
async fn subjects_of(
    service: &AcademicService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.list_student_subjects(student_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Student subjects retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

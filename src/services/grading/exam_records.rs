use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::GradingService;
use crate::errors::SchoolError;
use crate::models::{
    ApiResponse, ErrorCode,
    common::PaginationQuery,
    grading::requests::{
        ExamRecordListParams, ExamRecordListQuery, ExamRecordRequest, PatchExamRecordRequest,
        validate_score,
    },
    users::entities::UserRole,
};
use crate::services::{
    bad_request, current_user, error_response, error_response_coded, not_found, today,
};

fn write_error(e: &SchoolError) -> HttpResponse {
    match e {
        SchoolError::Validation(msg) if msg.contains("already exists") => {
            error_response_coded(e, ErrorCode::ExamRecordDuplicate)
        }
        SchoolError::NotFound(msg) if msg.starts_with("Exam type") => {
            error_response_coded(e, ErrorCode::ExamTypeNotFound)
        }
        SchoolError::NotFound(msg) if msg.starts_with("Grade") => {
            error_response_coded(e, ErrorCode::GradeScaleNotFound)
        }
        SchoolError::NotFound(msg) if msg.starts_with("Student") => {
            error_response_coded(e, ErrorCode::StudentNotFound)
        }
        _ => error_response(e),
    }
}

pub async fn list_exam_records(
    service: &GradingService,
    query: ExamRecordListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = ExamRecordListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        classroom_id: query.classroom_id,
        subject_id: query.subject_id,
        student_id: query.student_id,
        exam_type_id: query.exam_type_id,
    };

    match storage.list_exam_records_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Exam records retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// 学生查看自己的成绩
pub async fn list_my_exam_records(
    service: &GradingService,
    pagination: PaginationQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    if me.role != UserRole::Student {
        return Ok(not_found(ErrorCode::StudentNotFound, "Student profile not found"));
    }
    let storage = service.get_storage(request)?;

    let list_query = ExamRecordListQuery {
        page: Some(pagination.page),
        size: Some(pagination.size),
        student_id: Some(me.id),
        ..Default::default()
    };

    match storage.list_exam_records_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Exam records retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn create_exam_record(
    service: &GradingService,
    body: ExamRecordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_score(body.score) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    let storage = service.get_storage(request)?;

    match storage.create_exam_record(body, today()).await {
        Ok(view) => {
            info!(
                "录入成绩 {}: 学生 {} 科目 {}",
                view.record.id, view.record.student_id, view.record.subject_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                view,
                "Exam record created successfully",
            )))
        }
        Err(e) => Ok(write_error(&e)),
    }
}

pub async fn get_exam_record(
    service: &GradingService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    match storage.get_exam_record(id).await {
        // 学生只能看自己的成绩
        Ok(Some(view)) if me.role == UserRole::Student && view.record.student_id != me.id => {
            Ok(not_found(ErrorCode::ExamRecordNotFound, "Exam record not found"))
        }
        Ok(Some(view)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            view,
            "Exam record retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ExamRecordNotFound, "Exam record not found")),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn replace_exam_record(
    service: &GradingService,
    id: i64,
    body: ExamRecordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_score(body.score) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    let storage = service.get_storage(request)?;

    match storage.update_exam_record(id, body).await {
        Ok(Some(view)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            view,
            "Exam record updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ExamRecordNotFound, "Exam record not found")),
        Err(e) => Ok(write_error(&e)),
    }
}

pub async fn patch_exam_record(
    service: &GradingService,
    id: i64,
    body: PatchExamRecordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(score) = body.score
        && let Err(msg) = validate_score(score)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    let storage = service.get_storage(request)?;

    let current = match storage.get_exam_record(id).await {
        Ok(Some(view)) => view.record,
        Ok(None) => return Ok(not_found(ErrorCode::ExamRecordNotFound, "Exam record not found")),
        Err(e) => return Ok(error_response(&e)),
    };

    match storage.update_exam_record(id, body.apply_to(&current)).await {
        Ok(Some(view)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            view,
            "Exam record updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ExamRecordNotFound, "Exam record not found")),
        Err(e) => Ok(write_error(&e)),
    }
}

pub async fn delete_exam_record(
    service: &GradingService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_exam_record(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Exam record deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::ExamRecordNotFound, "Exam record not found")),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_duplicate_record_is_bad_request() {
        let res = write_error(&SchoolError::validation(
            "An exam record for this student, subject, exam type and classroom already exists",
        ));
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = write_error(&SchoolError::not_found("Exam type not found"));
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}

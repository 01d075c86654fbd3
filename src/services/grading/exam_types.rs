use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradingService;
use crate::errors::SchoolError;
use crate::models::{
    ApiResponse, ErrorCode,
    grading::{requests::CreateExamTypeRequest, responses::ExamTypeListResponse},
};
use crate::services::{bad_request, error_response, error_response_coded, not_found};

pub async fn list_exam_types(
    service: &GradingService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_exam_types().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ExamTypeListResponse { items },
            "Exam types retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn create_exam_type(
    service: &GradingService,
    body: CreateExamTypeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let name = body.name.trim();
    if name.is_empty() {
        return Ok(bad_request(ErrorCode::BadRequest, "Exam type name is required"));
    }
    let storage = service.get_storage(request)?;

    match storage.create_exam_type(name).await {
        Ok(exam_type) => Ok(HttpResponse::Created().json(ApiResponse::success(
            exam_type,
            "Exam type created successfully",
        ))),
        Err(e @ SchoolError::Conflict(_)) => {
            Ok(error_response_coded(&e, ErrorCode::ExamTypeExists))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn delete_exam_type(
    service: &GradingService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_exam_type(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Exam type deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::ExamTypeNotFound, "Exam type not found")),
        Err(e) => Ok(error_response(&e)),
    }
}

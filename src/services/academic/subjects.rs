use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AcademicService;
use crate::errors::SchoolError;
use crate::models::{
    ApiResponse, ErrorCode,
    academic::{
        requests::{CreateSubjectRequest, UpdateSubjectRequest},
        responses::SubjectListResponse,
    },
};
use crate::services::{bad_request, error_response, error_response_coded, not_found};

pub async fn list_subjects(
    service: &AcademicService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_subjects().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubjectListResponse { items },
            "Subjects retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn create_subject(
    service: &AcademicService,
    body: CreateSubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = body.validate() {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    let storage = service.get_storage(request)?;

    match storage.create_subject(body).await {
        Ok(subject) => Ok(HttpResponse::Created().json(ApiResponse::success(
            subject,
            "Subject created successfully",
        ))),
        Err(e @ SchoolError::Conflict(_)) => {
            Ok(error_response_coded(&e, ErrorCode::SubjectCodeExists))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_subject(
    service: &AcademicService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_subject_by_id(id).await {
        Ok(Some(subject)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            subject,
            "Subject retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn update_subject(
    service: &AcademicService,
    id: i64,
    body: UpdateSubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = body.validate() {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    let storage = service.get_storage(request)?;

    match storage.update_subject(id, body).await {
        Ok(Some(subject)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            subject,
            "Subject updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e @ SchoolError::Conflict(_)) => {
            Ok(error_response_coded(&e, ErrorCode::SubjectCodeExists))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn delete_subject(
    service: &AcademicService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_subject(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Subject deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => Ok(error_response(&e)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradingService;
use crate::models::{
    ApiResponse, ErrorCode,
    grading::{
        requests::{GradeScaleRequest, PatchGradeScaleRequest, ResolveGradeQuery, validate_score},
        responses::{GradeScaleListResponse, ResolvedGradeResponse},
    },
};
use crate::services::{bad_request, error_response, not_found};

pub async fn list_grade_scales(
    service: &GradingService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_grade_scales().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            GradeScaleListResponse { items },
            "Grades retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn create_grade_scale(
    service: &GradingService,
    body: GradeScaleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = body.validate() {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    let storage = service.get_storage(request)?;

    match storage.create_grade_scale(body).await {
        Ok(grade) => Ok(HttpResponse::Created().json(ApiResponse::success(
            grade,
            "Grade created successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_grade_scale(
    service: &GradingService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_grade_scale_by_id(id).await {
        Ok(Some(grade)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            grade,
            "Grade retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::GradeScaleNotFound, "Grade not found")),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn update_grade_scale(
    service: &GradingService,
    id: i64,
    body: GradeScaleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = body.validate() {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    let storage = service.get_storage(request)?;

    match storage.update_grade_scale(id, body).await {
        Ok(Some(grade)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            grade,
            "Grade updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::GradeScaleNotFound, "Grade not found")),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn patch_grade_scale(
    service: &GradingService,
    id: i64,
    body: PatchGradeScaleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let current = match storage.get_grade_scale_by_id(id).await {
        Ok(Some(grade)) => grade,
        Ok(None) => return Ok(not_found(ErrorCode::GradeScaleNotFound, "Grade not found")),
        Err(e) => return Ok(error_response(&e)),
    };

    let merged = body.apply_to(&current);
    if let Err(msg) = merged.validate() {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    match storage.update_grade_scale(id, merged).await {
        Ok(Some(grade)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            grade,
            "Grade updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::GradeScaleNotFound, "Grade not found")),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn delete_grade_scale(
    service: &GradingService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_grade_scale(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Grade deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::GradeScaleNotFound, "Grade not found")),
        Err(e) => Ok(error_response(&e)),
    }
}

/// 分数落在区间空隙里时 grade 为空
pub async fn resolve_grade(
    service: &GradingService,
    query: ResolveGradeQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_score(query.score) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    let storage = service.get_storage(request)?;

    match storage.resolve_grade(query.score).await {
        Ok(grade) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ResolvedGradeResponse {
                score: query.score,
                grade,
            },
            "Grade resolved",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::LibraryService;
use crate::errors::SchoolError;
use crate::models::{
    ApiResponse, ErrorCode,
    library::{
        requests::{CreateLibraryResourceRequest, LibraryResourceListParams},
        responses::LibraryResourceListResponse,
    },
};
use crate::services::files::send_stored_file;
use crate::services::{
    bad_request, current_user, error_response, error_response_coded, not_found,
};

pub async fn list_resources(
    service: &LibraryService,
    query: LibraryResourceListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_library_resources(query).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            LibraryResourceListResponse { items },
            "Library resources retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn create_resource(
    service: &LibraryService,
    body: CreateLibraryResourceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    if body.title.trim().is_empty() || body.subject.trim().is_empty() {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "Title and subject are required",
        ));
    }
    let storage = service.get_storage(request)?;

    match storage.create_library_resource(body, me.id).await {
        Ok(resource) => Ok(HttpResponse::Created().json(ApiResponse::success(
            resource,
            "Library resource created successfully",
        ))),
        Err(e @ SchoolError::NotFound(_)) => Ok(error_response_coded(&e, ErrorCode::FileNotFound)),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_resource(
    service: &LibraryService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_library_resource(id).await {
        Ok(Some(resource)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            resource,
            "Library resource retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::LibraryResourceNotFound,
            "Library resource not found",
        )),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn delete_resource(
    service: &LibraryService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_library_resource(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Library resource deleted successfully",
        ))),
        Ok(false) => Ok(not_found(
            ErrorCode::LibraryResourceNotFound,
            "Library resource not found",
        )),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn download_resource(
    service: &LibraryService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let resource = match storage.get_library_resource(id).await {
        Ok(Some(resource)) => resource,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::LibraryResourceNotFound,
                "Library resource not found",
            ));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    send_stored_file(storage.as_ref(), request, &resource.file_token).await
}

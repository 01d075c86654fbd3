use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::LibraryService;
use crate::errors::SchoolError;
use crate::models::{
    ApiResponse, ErrorCode,
    library::{requests::CreateBookCategoryRequest, responses::BookCategoryListResponse},
};
use crate::services::{bad_request, error_response, error_response_coded};

pub async fn list_categories(
    service: &LibraryService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_book_categories().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            BookCategoryListResponse { items },
            "Book categories retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn create_category(
    service: &LibraryService,
    body: CreateBookCategoryRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if body.name.trim().is_empty() {
        return Ok(bad_request(ErrorCode::BadRequest, "Category name is required"));
    }
    let storage = service.get_storage(request)?;

    match storage.create_book_category(body).await {
        Ok(category) => Ok(HttpResponse::Created().json(ApiResponse::success(
            category,
            "Book category created successfully",
        ))),
        Err(e @ SchoolError::Conflict(_)) => {
            Ok(error_response_coded(&e, ErrorCode::BookCategoryExists))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

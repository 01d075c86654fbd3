use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::LibraryService;
use crate::models::{
    ApiResponse, ErrorCode,
    library::requests::{BookListParams, BookListQuery, CreateBookRequest, UpdateBookRequest},
};
use crate::services::{bad_request, error_response, not_found};

pub async fn list_books(
    service: &LibraryService,
    query: BookListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = BookListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        category_id: query.category_id,
        search: query.search,
    };

    match storage.list_books_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Books retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn create_book(
    service: &LibraryService,
    body: CreateBookRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = body.validate() {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    let storage = service.get_storage(request)?;

    match storage.create_book(body).await {
        Ok(book) => {
            info!("新增图书 {} 《{}》 共 {} 册", book.id, book.title, book.total_copies);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                book,
                "Book created successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_book(
    service: &LibraryService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_book_by_id(id).await {
        Ok(Some(book)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            book,
            "Book retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::BookNotFound, "Book not found")),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn update_book(
    service: &LibraryService,
    id: i64,
    body: UpdateBookRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = body.validate() {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    let storage = service.get_storage(request)?;

    match storage.update_book(id, body).await {
        Ok(Some(book)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            book,
            "Book updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::BookNotFound, "Book not found")),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn delete_book(
    service: &LibraryService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_book(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Book deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::BookNotFound, "Book not found")),
        Err(e) => Ok(error_response(&e)),
    }
}

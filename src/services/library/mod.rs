//! 图书馆：分类、图书、借还和往年试卷

pub mod books;
pub mod categories;
pub mod loans;
pub mod resources;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::library::requests::{
    BookListParams, BorrowBookRequest, CreateBookCategoryRequest, CreateBookRequest,
    CreateLibraryResourceRequest, LibraryResourceListParams, UpdateBookRequest,
};
use crate::storage::Storage;

pub struct LibraryService {
    storage: Option<Arc<dyn Storage>>,
}

impl LibraryService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    // 分类
    pub async fn list_categories(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        categories::list_categories(self, request).await
    }

    pub async fn create_category(
        &self,
        body: CreateBookCategoryRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        categories::create_category(self, body, request).await
    }

    // 图书
    pub async fn list_books(
        &self,
        query: BookListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        books::list_books(self, query, request).await
    }

    pub async fn create_book(
        &self,
        body: CreateBookRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        books::create_book(self, body, request).await
    }

    pub async fn get_book(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        books::get_book(self, id, request).await
    }

    pub async fn update_book(
        &self,
        id: i64,
        body: UpdateBookRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        books::update_book(self, id, body, request).await
    }

    pub async fn delete_book(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        books::delete_book(self, id, request).await
    }

    // 借还
    pub async fn borrow_book(
        &self,
        body: BorrowBookRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        loans::borrow_book(self, body, request).await
    }

    pub async fn return_book(
        &self,
        borrow_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        loans::return_book(self, borrow_id, request).await
    }

    pub async fn get_borrowed(
        &self,
        borrow_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        loans::get_borrowed(self, borrow_id, request).await
    }

    pub async fn my_borrowed(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        loans::my_borrowed(self, request).await
    }

    pub async fn all_borrowed(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        loans::all_borrowed(self, request).await
    }

    pub async fn overdue_borrowed(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        loans::overdue_borrowed(self, request).await
    }

    // 往年试卷
    pub async fn list_resources(
        &self,
        query: LibraryResourceListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        resources::list_resources(self, query, request).await
    }

    pub async fn create_resource(
        &self,
        body: CreateLibraryResourceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        resources::create_resource(self, body, request).await
    }

    pub async fn get_resource(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        resources::get_resource(self, id, request).await
    }

    pub async fn delete_resource(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        resources::delete_resource(self, id, request).await
    }

    pub async fn download_resource(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        resources::download_resource(self, id, request).await
    }
}

pub mod list;
pub mod record;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::attendance::requests::{
    AttendanceListParams, CreateAttendanceRequest, UpdateAttendanceRequest,
};
use crate::models::common::PaginationQuery;
use crate::storage::Storage;

pub struct AttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttendanceService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    pub async fn create_attendance(
        &self,
        body: CreateAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        record::create_attendance(self, body, request).await
    }

    pub async fn get_attendance(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        record::get_attendance(self, id, request).await
    }

    pub async fn update_attendance(
        &self,
        id: i64,
        body: UpdateAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        record::update_attendance(self, id, body, request).await
    }

    pub async fn delete_attendance(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        record::delete_attendance(self, id, request).await
    }

    pub async fn list_attendance(
        &self,
        query: AttendanceListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_attendance(self, query, request).await
    }

    pub async fn list_my_attendance(
        &self,
        pagination: PaginationQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_my_attendance(self, pagination, request).await
    }
}

pub mod manage;
pub mod read;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::announcements::requests::{
    AnnouncementListParams, CreateAnnouncementRequest, UpdateAnnouncementRequest,
};
use crate::storage::Storage;

pub struct AnnouncementService {
    storage: Option<Arc<dyn Storage>>,
}

impl AnnouncementService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    pub async fn list_announcements(
        &self,
        query: AnnouncementListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        read::list_announcements(self, query, request).await
    }

    pub async fn get_announcement(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        read::get_announcement(self, id, request).await
    }

    pub async fn download_file(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        read::download_file(self, id, request).await
    }

    pub async fn create_announcement(
        &self,
        body: CreateAnnouncementRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_announcement(self, body, request).await
    }

    pub async fn update_announcement(
        &self,
        id: i64,
        body: UpdateAnnouncementRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_announcement(self, id, body, request).await
    }

    pub async fn delete_announcement(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::delete_announcement(self, id, request).await
    }
}

pub mod get;
pub mod upsert;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::profiles::requests::UpsertProfileRequest;
use crate::storage::Storage;

pub struct ProfileService {
    storage: Option<Arc<dyn Storage>>,
}

impl ProfileService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    pub async fn get_my_profile(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_my_profile(self, request).await
    }

    pub async fn get_profile(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_profile(self, user_id, request).await
    }

    // 创建或更新本人资料
    pub async fn upsert_my_profile(
        &self,
        body: UpsertProfileRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        upsert::upsert_my_profile(self, body, request).await
    }
}

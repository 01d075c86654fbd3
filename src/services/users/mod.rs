pub mod delete;
pub mod get;
pub mod list;
pub mod register_student;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::users::requests::{AssignRoleRequest, RegisterStudentRequest, UserListParams};
use crate::storage::Storage;

pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

impl UserService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    // 分页列出用户
    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    // 待分配角色的用户
    pub async fn list_unassigned(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_unassigned(self, request).await
    }

    pub async fn list_by_role(&self, role: &str, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_by_role(self, role, request).await
    }

    // 各角色人数
    pub async fn count_by_role(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::count_by_role(self, request).await
    }

    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_user(self, user_id, request).await
    }

    pub async fn register_student(
        &self,
        body: RegisterStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        register_student::register_student(self, body, request).await
    }

    pub async fn assign_role(
        &self,
        user_id: i64,
        body: AssignRoleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::assign_role(self, user_id, body, request).await
    }

    // 封禁 / 解封
    pub async fn toggle_block(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::toggle_block(self, user_id, request).await
    }

    pub async fn delete_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_user(self, user_id, request).await
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::cache;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::{UserRole, UserStatus},
        requests::{AssignRoleRequest, UpdateUserRequest},
        responses::UserResponse,
    },
};
use crate::services::{bad_request, cache_from, current_user, error_response, not_found};

pub async fn assign_role(
    service: &UserService,
    user_id: i64,
    body: AssignRoleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let object_cache = cache_from(request)?;
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    if !UserRole::assignable_roles().contains(&&body.role) {
        return Ok(bad_request(ErrorCode::InvalidRole, "Role cannot be assigned"));
    }
    if actor.id == user_id {
        return Ok(bad_request(
            ErrorCode::UserUpdateFailed,
            "Cannot change your own role",
        ));
    }

    let update = UpdateUserRequest {
        role: Some(body.role),
        ..Default::default()
    };
    match storage.update_user(user_id, update).await {
        Ok(Some(user)) => {
            cache::evict_user(object_cache.as_ref(), user_id).await;
            info!("用户 {} 被分配角色 {}", user_id, user.role);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "Role assigned successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(error_response(&e)),
    }
}

/// active 与 suspended 互相切换
pub async fn toggle_block(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let object_cache = cache_from(request)?;
    let actor = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    if actor.id == user_id {
        return Ok(bad_request(
            ErrorCode::UserUpdateFailed,
            "Cannot block your own account",
        ));
    }

    let target = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => return Ok(error_response(&e)),
    };

    let next = if target.is_blocked() {
        UserStatus::Active
    } else {
        UserStatus::Suspended
    };
    let update = UpdateUserRequest {
        status: Some(next),
        ..Default::default()
    };

    match storage.update_user(user_id, update).await {
        Ok(Some(user)) => {
            cache::evict_user(object_cache.as_ref(), user_id).await;
            info!("用户 {} 状态变为 {}", user_id, user.status);
            let message = if user.is_blocked() {
                "User blocked successfully"
            } else {
                "User unblocked successfully"
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(UserResponse { user }, message)))
        }
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(error_response(&e)),
    }
}

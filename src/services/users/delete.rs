use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::cache;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, cache_from, current_user, error_response_coded, not_found};

pub async fn delete_user(
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
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot delete current user",
        ));
    }

    match storage.delete_user(user_id).await {
        Ok(true) => {
            cache::evict_user(object_cache.as_ref(), user_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(error_response_coded(&e, ErrorCode::UserDeleteFailed)),
    }
}

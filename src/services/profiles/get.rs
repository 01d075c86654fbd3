use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProfileService;
use crate::models::{
    ApiResponse, ErrorCode,
    profiles::{entities::Profile, responses::ProfileResponse},
    users::entities::{User, UserSummary},
};
use crate::services::{current_user, error_response, not_found};

async fn profile_of(
    service: &ProfileService,
    user: &User,
    viewer: &User,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_profile(user.id).await {
        Ok(record) => {
            let profile = record
                .and_then(|r| Profile::from_record(user.role, r))
                .map(|p| p.visible_to(viewer.id, viewer.role));
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ProfileResponse {
                    user: UserSummary::from(user),
                    profile,
                },
                "Profile retrieved successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_my_profile(
    service: &ProfileService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    profile_of(service, &me, &me, request).await
}

pub async fn get_profile(
    service: &ProfileService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let viewer = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let storage = service.get_storage(request)?;
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => return Ok(error_response(&e)),
    };

    profile_of(service, &user, &viewer, request).await
}

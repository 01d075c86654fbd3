use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProfileService;
use crate::models::{
    ApiResponse, ErrorCode,
    profiles::{entities::Profile, requests::UpsertProfileRequest, responses::ProfileResponse},
    users::entities::UserSummary,
};
use crate::services::{bad_request, current_user, error_response, error_response_coded, not_found};

pub async fn upsert_my_profile(
    service: &ProfileService,
    body: UpsertProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    // 只保留当前角色的字段
    let Some(changes) = body.restrict_to(me.role) else {
        return Ok(bad_request(
            ErrorCode::RoleNotAssigned,
            "Role not assigned, please wait for the Head Teacher",
        ));
    };

    let storage = service.get_storage(request)?;

    if let Some(token) = &changes.avatar_token {
        match storage.get_file_by_token(token).await {
            Ok(Some(_)) => {}
            Ok(None) => return Ok(not_found(ErrorCode::FileNotFound, "Avatar file not found")),
            Err(e) => return Ok(error_response(&e)),
        }
    }

    match storage.upsert_profile(me.id, changes).await {
        Ok(record) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ProfileResponse {
                user: UserSummary::from(&me),
                profile: Profile::from_record(me.role, record),
            },
            "Profile saved successfully",
        ))),
        Err(e) => Ok(error_response_coded(&e, ErrorCode::ProfileUpdateFailed)),
    }
}

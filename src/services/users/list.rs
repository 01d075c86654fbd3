use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::{UserRole, UserSummary},
        requests::{UserListParams, UserListQuery},
        responses::{RoleCountResponse, UserSummaryListResponse},
    },
};
use crate::services::{bad_request, error_response};

pub async fn list_users(
    service: &UserService,
    query: UserListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = UserListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        role: query.role,
        status: query.status,
        search: query.search,
    };

    match storage.list_users_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "User list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn summaries_for(
    service: &UserService,
    role: UserRole,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.list_users_by_role(role).await {
        Ok(users) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserSummaryListResponse {
                role: Some(role),
                items: users.iter().map(UserSummary::from).collect(),
            },
            "Users retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn list_unassigned(
    service: &UserService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    summaries_for(service, UserRole::Pending, request).await
}

pub async fn list_by_role(
    service: &UserService,
    role: &str,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match role.parse::<UserRole>() {
        Ok(role) => summaries_for(service, role, request).await,
        Err(msg) => Ok(bad_request(ErrorCode::InvalidRole, msg)),
    }
}

pub async fn count_by_role(
    service: &UserService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.count_users_by_role().await {
        Ok(counts) => {
            let total = counts.iter().map(|c| c.count).sum();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                RoleCountResponse { total, counts },
                "User counts retrieved successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::AuthService;
use crate::models::auth::responses::{
    RefreshTokenResponse, TokenVerificationResponse, UserInfoResponse,
};
use crate::models::users::entities::UserStatus;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{config_from, current_user, error_response};
use crate::utils::jwt::{JwtUtils, TokenKind};

/// 用 cookie 中的 refresh token 换新的 access token。
/// 角色以数据库为准，被封禁的账号不能续期。
pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = config_from(request)?;
    let secure = config.is_production();

    let expired = |message: &str| {
        HttpResponse::Unauthorized()
            .cookie(JwtUtils::expired_refresh_token_cookie(secure))
            .json(ApiResponse::error_empty(ErrorCode::Unauthorized, message))
    };

    let Some(refresh_token) = JwtUtils::refresh_token_from(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let claims = match JwtUtils::verify(&config.jwt, &refresh_token, TokenKind::Refresh) {
        Ok(claims) => claims,
        Err(e) => {
            info!("refresh token 无效: {}", e);
            return Ok(expired("Login expired or invalid, please login again"));
        }
    };
    let Some(user_id) = claims.user_id() else {
        return Ok(expired("Login expired or invalid, please login again"));
    };

    let storage = service.get_storage(request)?;
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.status == UserStatus::Active => user,
        Ok(_) => return Ok(expired("Login expired or invalid, please login again")),
        Err(e) => return Ok(error_response(&e)),
    };

    match JwtUtils::issue_access(&config.jwt, user.id, user.role) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: config.jwt.access_token_expiry * 60,
            },
            "Token refreshed successfully",
        ))),
        Err(e) => {
            error!("生成 access token 失败: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Unable to refresh token",
                )),
            )
        }
    }
}

pub async fn handle_logout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let config = config_from(request)?;
    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::expired_refresh_token_cookie(config.is_production()))
        .json(ApiResponse::success_empty("Logged out successfully")))
}

pub async fn handle_verify_token(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let is_valid = current_user(request).is_ok();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TokenVerificationResponse { is_valid },
        "Token is valid",
    )))
}

pub async fn handle_get_user(request: &HttpRequest) -> ActixResult<HttpResponse> {
    match current_user(request) {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserInfoResponse { user },
            "User information retrieved successfully",
        ))),
        Err(response) => Ok(response),
    }
}

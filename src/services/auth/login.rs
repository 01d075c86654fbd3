use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use super::AuthService;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
    users::entities::UserStatus,
};
use crate::services::{config_from, error_response};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

fn invalid_credentials() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        "Email or password is incorrect",
    ))
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let config = config_from(request)?;

    let email = login_request.email.trim().to_lowercase();
    let user = match storage.get_user_by_email(&email).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(invalid_credentials()),
        Err(e) => return Ok(error_response(&e)),
    };

    if !verify_password(&login_request.password, &user.password_hash) {
        warn!("用户 {} 密码错误", user.id);
        return Ok(invalid_credentials());
    }

    if user.status != UserStatus::Active {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::AccountBlocked,
            "Account is blocked, please contact the Head Teacher",
        )));
    }

    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("更新用户 {} 最后登录时间失败: {}", user.id, e);
    }

    let pair = match JwtUtils::issue_pair(&config.jwt, user.id, user.role, login_request.remember_me)
    {
        Ok(pair) => pair,
        Err(e) => {
            error!("生成 JWT 失败: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            );
        }
    };

    info!("用户 {} 登录成功", user.id);

    let cookie = JwtUtils::refresh_token_cookie(
        &pair.refresh_token,
        JwtUtils::refresh_lifetime_days(&config.jwt, login_request.remember_me),
        config.is_production(),
    );
    let response = LoginResponse {
        access_token: pair.access_token,
        expires_in: pair.expires_in,
        user,
        created_at: chrono::Utc::now(),
    };

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::success(response, "Login successful")))
}

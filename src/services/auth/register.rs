use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AuthService;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::RegisterRequest,
    users::{entities::UserRole, requests::CreateUserRequest},
};
use crate::services::{bad_request, config_from, error_response};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_name, validate_password};

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let config = config_from(request)?;

    let email = register_request.email.trim().to_lowercase();
    if let Err(msg) = validate_email(&email) {
        return Ok(bad_request(ErrorCode::RegisterFailed, msg));
    }
    for name in [&register_request.first_name, &register_request.last_name] {
        if let Err(msg) = validate_name(name.trim()) {
            return Ok(bad_request(ErrorCode::RegisterFailed, msg));
        }
    }
    if let Err(msg) = validate_password(&register_request.password) {
        return Ok(bad_request(ErrorCode::RegisterFailed, msg));
    }

    match storage.get_user_by_email(&email).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::EmailAlreadyExists,
                "Email already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(error_response(&e)),
    }

    let password_hash = match hash_password(&register_request.password, &config.argon2) {
        Ok(hash) => hash,
        Err(e) => return Ok(error_response(&e)),
    };

    let create = CreateUserRequest {
        email,
        first_name: register_request.first_name.trim().to_string(),
        last_name: register_request.last_name.trim().to_string(),
        password: password_hash,
        role: UserRole::Pending,
    };

    match storage.create_user(create).await {
        Ok(user) => {
            info!("新用户 {} 自助注册，等待分配角色", user.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                user,
                "Registration successful, waiting for Head Teacher to assign role",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

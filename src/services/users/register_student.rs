use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::errors::SchoolError;
use crate::models::{
    ApiResponse, ErrorCode,
    profiles::{entities::Profile, requests::ProfileChanges},
    users::{
        entities::UserRole,
        requests::{CreateUserRequest, RegisterStudentRequest},
        responses::RegisteredStudentResponse,
    },
};
use crate::services::{bad_request, config_from, error_response, error_response_coded};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_name, validate_password};

/// 校长直接注册学生：账号、资料和入班在一个事务里完成
pub async fn register_student(
    service: &UserService,
    body: RegisterStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let config = config_from(request)?;

    let email = body.email.trim().to_lowercase();
    if let Err(msg) = validate_email(&email) {
        return Ok(bad_request(ErrorCode::UserCreationFailed, msg));
    }
    for name in [&body.first_name, &body.last_name] {
        if let Err(msg) = validate_name(name.trim()) {
            return Ok(bad_request(ErrorCode::UserCreationFailed, msg));
        }
    }
    if let Err(msg) = validate_password(&body.password) {
        return Ok(bad_request(ErrorCode::UserCreationFailed, msg));
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

    let password = match hash_password(&body.password, &config.argon2) {
        Ok(hash) => hash,
        Err(e) => return Ok(error_response(&e)),
    };

    let user = CreateUserRequest {
        email,
        first_name: body.first_name.trim().to_string(),
        last_name: body.last_name.trim().to_string(),
        password,
        role: UserRole::Student,
    };
    let profile = ProfileChanges {
        address: body.address,
        guardian_phone: body.guardian_phone,
        ..Default::default()
    };

    match storage.register_student(user, profile, body.classroom_id).await {
        Ok((user, record, subjects_assigned)) => {
            info!(
                "注册学生 {}，同步科目 {} 门",
                user.id, subjects_assigned
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                RegisteredStudentResponse {
                    profile: Profile::from_record(user.role, record),
                    user,
                    subjects_assigned,
                },
                "Student registered successfully",
            )))
        }
        Err(e @ SchoolError::NotFound(_)) => {
            Ok(error_response_coded(&e, ErrorCode::ClassroomNotFound))
        }
        Err(e @ SchoolError::Validation(_)) => {
            Ok(error_response_coded(&e, ErrorCode::EnrollmentFailed))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

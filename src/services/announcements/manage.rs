use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AnnouncementService;
use crate::errors::SchoolError;
use crate::models::{
    ApiResponse, ErrorCode,
    announcements::requests::{CreateAnnouncementRequest, UpdateAnnouncementRequest},
    users::entities::User,
};
use crate::services::{
    bad_request, current_user, error_response, error_response_coded, forbidden, not_found,
};

/// 发布者本人或教务人员、校长可以修改
fn can_manage(user: &User, posted_by: i64) -> bool {
    user.id == posted_by || user.role.is_staff()
}

/// 取出公告并检查修改权限，失败时直接给出响应
async fn load_owned(
    service: &AnnouncementService,
    id: i64,
    me: &User,
    request: &HttpRequest,
) -> ActixResult<Result<(), HttpResponse>> {
    let storage = service.get_storage(request)?;

    Ok(match storage.get_announcement(id).await {
        Ok(Some(view)) if can_manage(me, view.announcement.posted_by) => Ok(()),
        Ok(Some(_)) => Err(forbidden(
            "Only the author or school staff can modify this announcement",
        )),
        Ok(None) => Err(not_found(
            ErrorCode::AnnouncementNotFound,
            "Announcement not found",
        )),
        Err(e) => Err(error_response(&e)),
    })
}

pub async fn create_announcement(
    service: &AnnouncementService,
    body: CreateAnnouncementRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    if let Err(msg) = body.validate() {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    let storage = service.get_storage(request)?;

    match storage.create_announcement(body, me.id).await {
        Ok(view) => {
            info!("用户 {} 发布公告 {}", me.id, view.announcement.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                view,
                "Announcement created successfully",
            )))
        }
        Err(e @ SchoolError::NotFound(_)) => Ok(error_response_coded(&e, ErrorCode::FileNotFound)),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn update_announcement(
    service: &AnnouncementService,
    id: i64,
    body: UpdateAnnouncementRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    if body.title.as_deref().is_some_and(|t| t.trim().is_empty())
        || body.content.as_deref().is_some_and(|c| c.trim().is_empty())
    {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "Title and content must not be empty",
        ));
    }
    if let Err(response) = load_owned(service, id, &me, request).await? {
        return Ok(response);
    }
    let storage = service.get_storage(request)?;

    match storage.update_announcement(id, body).await {
        Ok(Some(view)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            view,
            "Announcement updated successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::AnnouncementNotFound,
            "Announcement not found",
        )),
        Err(e @ SchoolError::NotFound(_)) => Ok(error_response_coded(&e, ErrorCode::FileNotFound)),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn delete_announcement(
    service: &AnnouncementService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    if let Err(response) = load_owned(service, id, &me, request).await? {
        return Ok(response);
    }
    let storage = service.get_storage(request)?;

    match storage.delete_announcement(id).await {
        Ok(true) => {
            info!("用户 {} 删除公告 {}", me.id, id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Announcement deleted successfully",
            )))
        }
        Ok(false) => Ok(not_found(
            ErrorCode::AnnouncementNotFound,
            "Announcement not found",
        )),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserRole, UserStatus};

    fn user(id: i64, role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            email: format!("u{id}@school.test"),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_only_author_or_staff_can_manage() {
        assert!(can_manage(&user(5, UserRole::Teacher), 5));
        assert!(!can_manage(&user(6, UserRole::Teacher), 5));
        assert!(can_manage(&user(6, UserRole::Staff), 5));
        assert!(can_manage(&user(1, UserRole::HeadTeacher), 5));
    }
}

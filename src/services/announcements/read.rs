use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnnouncementService;
use crate::models::{
    ApiResponse, ErrorCode,
    announcements::requests::{AnnouncementListParams, AnnouncementListQuery},
};
use crate::services::files::send_stored_file;
use crate::services::{error_response, not_found};

pub async fn list_announcements(
    service: &AnnouncementService,
    query: AnnouncementListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = AnnouncementListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        category: query.category,
        user_id: query.user_id,
    };

    match storage.list_announcements_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Announcements retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_announcement(
    service: &AnnouncementService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_announcement(id).await {
        Ok(Some(view)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            view,
            "Announcement retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::AnnouncementNotFound,
            "Announcement not found",
        )),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn download_file(
    service: &AnnouncementService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let token = match storage.get_announcement(id).await {
        Ok(Some(view)) => match view.announcement.file_token {
            Some(token) => token,
            None => {
                return Ok(not_found(
                    ErrorCode::AnnouncementHasNoFile,
                    "This announcement has no attached file",
                ));
            }
        },
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::AnnouncementNotFound,
                "Announcement not found",
            ));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    send_stored_file(storage.as_ref(), request, &token).await
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AcademicService;
use crate::models::{
    ApiResponse, ErrorCode,
    academic::{
        requests::{
            ClassroomListParams, ClassroomListQuery, CreateClassroomRequest,
            UpdateClassroomRequest,
        },
        responses::ClassroomDetailsResponse,
    },
    users::entities::UserSummary,
};
use crate::services::{bad_request, error_response, not_found};
use crate::storage::Storage;

/// 班主任必须是教学岗位的用户
async fn check_class_teacher(
    storage: &dyn Storage,
    teacher_id: Option<i64>,
) -> Result<(), HttpResponse> {
    let Some(teacher_id) = teacher_id else {
        return Ok(());
    };
    match storage.get_user_by_id(teacher_id).await {
        Ok(Some(user)) if user.role.is_teaching() => Ok(()),
        Ok(_) => Err(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
        Err(e) => Err(error_response(&e)),
    }
}

pub async fn list_classrooms(
    service: &AcademicService,
    query: ClassroomListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = ClassroomListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        academic_year: query.academic_year,
        search: query.search,
    };

    match storage.list_classrooms_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Classrooms retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn create_classroom(
    service: &AcademicService,
    body: CreateClassroomRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = body.validate() {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request)?;
    if let Err(response) = check_class_teacher(storage.as_ref(), body.class_teacher_id).await {
        return Ok(response);
    }

    match storage.create_classroom(body).await {
        Ok(classroom) => Ok(HttpResponse::Created().json(ApiResponse::success(
            classroom,
            "Classroom created successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_classroom(
    service: &AcademicService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_classroom_by_id(id).await {
        Ok(Some(classroom)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            classroom,
            "Classroom retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ClassroomNotFound, "Classroom not found")),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_classroom_details(
    service: &AcademicService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let classroom = match storage.get_classroom_by_id(id).await {
        Ok(Some(classroom)) => classroom,
        Ok(None) => return Ok(not_found(ErrorCode::ClassroomNotFound, "Classroom not found")),
        Err(e) => return Ok(error_response(&e)),
    };

    let students = match storage.list_classroom_students(id).await {
        Ok(users) => users.iter().map(UserSummary::from).collect(),
        Err(e) => return Ok(error_response(&e)),
    };

    match storage.list_classroom_subjects(id).await {
        Ok(subjects) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassroomDetailsResponse {
                classroom,
                students,
                subjects,
            },
            "Classroom details retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn update_classroom(
    service: &AcademicService,
    id: i64,
    body: UpdateClassroomRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = body.validate() {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request)?;
    if let Err(response) = check_class_teacher(storage.as_ref(), body.class_teacher_id).await {
        return Ok(response);
    }

    match storage.update_classroom(id, body).await {
        Ok(Some(classroom)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            classroom,
            "Classroom updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ClassroomNotFound, "Classroom not found")),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn delete_classroom(
    service: &AcademicService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_classroom(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Classroom deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::ClassroomNotFound, "Classroom not found")),
        Err(e) => Ok(error_response(&e)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AcademicService;
use crate::errors::SchoolError;
use crate::models::{
    ApiResponse, ErrorCode,
    academic::{
        requests::AssignSubjectRequest,
        responses::{AssignSubjectResponse, ClassroomSubjectListResponse},
    },
};
use crate::services::{bad_request, error_response, error_response_coded, not_found};

fn not_found_code(message: &str) -> ErrorCode {
    if message.starts_with("Teacher") {
        ErrorCode::TeacherNotFound
    } else if message.starts_with("Subject") {
        ErrorCode::SubjectNotFound
    } else {
        ErrorCode::ClassroomNotFound
    }
}

/// 按 (classroom, subject) 覆盖写入任课教师
pub async fn assign_subject(
    service: &AcademicService,
    body: AssignSubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (Some(classroom_id), Some(subject_id)) = (body.classroom_id, body.subject_id) else {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "classroom_id and subject_id are required",
        ));
    };
    let storage = service.get_storage(request)?;

    match storage
        .assign_classroom_subject(classroom_id, subject_id, body.teacher_id)
        .await
    {
        Ok((assignment, created)) => {
            let message = if created {
                "Subject assigned successfully"
            } else {
                "Subject assignment updated successfully"
            };
            let response = AssignSubjectResponse {
                assignment,
                created,
            };
            if created {
                Ok(HttpResponse::Created().json(ApiResponse::success(response, message)))
            } else {
                Ok(HttpResponse::Ok().json(ApiResponse::success(response, message)))
            }
        }
        Err(e @ SchoolError::NotFound(_)) => {
            let code = not_found_code(e.message());
            Ok(error_response_coded(&e, code))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn list_classroom_subjects(
    service: &AcademicService,
    classroom_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_classroom_by_id(classroom_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::ClassroomNotFound, "Classroom not found")),
        Err(e) => return Ok(error_response(&e)),
    }

    match storage.list_classroom_subjects(classroom_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassroomSubjectListResponse {
                classroom_id,
                items,
            },
            "Classroom subjects retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_code_by_entity() {
        assert_eq!(not_found_code("Teacher not found"), ErrorCode::TeacherNotFound);
        assert_eq!(not_found_code("Subject not found"), ErrorCode::SubjectNotFound);
        assert_eq!(not_found_code("Classroom not found"), ErrorCode::ClassroomNotFound);
    }
}

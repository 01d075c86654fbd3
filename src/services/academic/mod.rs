pub mod assignments;
pub mod classrooms;
pub mod enrollments;
pub mod subjects;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::academic::requests::{
    AssignSubjectRequest, ClassroomListParams, CreateClassroomRequest, CreateSubjectRequest,
    EnrollStudentRequest, EnrollmentListParams, UpdateClassroomRequest, UpdateSubjectRequest,
};
use crate::storage::Storage;

pub struct AcademicService {
    storage: Option<Arc<dyn Storage>>,
}

impl AcademicService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    // 班级
    pub async fn list_classrooms(
        &self,
        query: ClassroomListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        classrooms::list_classrooms(self, query, request).await
    }

    pub async fn create_classroom(
        &self,
        body: CreateClassroomRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        classrooms::create_classroom(self, body, request).await
    }

    pub async fn get_classroom(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        classrooms::get_classroom(self, id, request).await
    }

    // 班级、学生和已分配科目
    pub async fn get_classroom_details(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        classrooms::get_classroom_details(self, id, request).await
    }

    pub async fn update_classroom(
        &self,
        id: i64,
        body: UpdateClassroomRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        classrooms::update_classroom(self, id, body, request).await
    }

    pub async fn delete_classroom(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        classrooms::delete_classroom(self, id, request).await
    }

    // 科目
    pub async fn list_subjects(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        subjects::list_subjects(self, request).await
    }

    pub async fn create_subject(
        &self,
        body: CreateSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        subjects::create_subject(self, body, request).await
    }

    pub async fn get_subject(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        subjects::get_subject(self, id, request).await
    }

    pub async fn update_subject(
        &self,
        id: i64,
        body: UpdateSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        subjects::update_subject(self, id, body, request).await
    }

    pub async fn delete_subject(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        subjects::delete_subject(self, id, request).await
    }

    // 班级科目分配
    pub async fn assign_subject(
        &self,
        body: AssignSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        assignments::assign_subject(self, body, request).await
    }

    pub async fn list_classroom_subjects(
        &self,
        classroom_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        assignments::list_classroom_subjects(self, classroom_id, request).await
    }

    // 入班
    pub async fn enroll_student(
        &self,
        body: EnrollStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enrollments::enroll_student(self, body, request).await
    }

    pub async fn list_enrollments(
        &self,
        query: EnrollmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enrollments::list_enrollments(self, query, request).await
    }

    pub async fn my_subjects(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        enrollments::my_subjects(self, request).await
    }

    pub async fn student_subjects(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enrollments::student_subjects(self, student_id, request).await
    }
}

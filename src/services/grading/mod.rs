pub mod exam_records;
pub mod exam_types;
pub mod grade_scales;
pub mod lookups;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::grading::requests::{
    CreateExamTypeRequest, ExamRecordListParams, ExamRecordRequest, GradeScaleRequest,
    PatchExamRecordRequest, PatchGradeScaleRequest, ResolveGradeQuery,
};
use crate::models::common::PaginationQuery;
use crate::storage::Storage;

pub struct GradingService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradingService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    // 考试类型
    pub async fn list_exam_types(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        exam_types::list_exam_types(self, request).await
    }

    pub async fn create_exam_type(
        &self,
        body: CreateExamTypeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        exam_types::create_exam_type(self, body, request).await
    }

    pub async fn delete_exam_type(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        exam_types::delete_exam_type(self, id, request).await
    }

    // 等级
    pub async fn list_grade_scales(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        grade_scales::list_grade_scales(self, request).await
    }

    pub async fn create_grade_scale(
        &self,
        body: GradeScaleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grade_scales::create_grade_scale(self, body, request).await
    }

    pub async fn get_grade_scale(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        grade_scales::get_grade_scale(self, id, request).await
    }

    pub async fn update_grade_scale(
        &self,
        id: i64,
        body: GradeScaleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grade_scales::update_grade_scale(self, id, body, request).await
    }

    pub async fn patch_grade_scale(
        &self,
        id: i64,
        body: PatchGradeScaleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grade_scales::patch_grade_scale(self, id, body, request).await
    }

    pub async fn delete_grade_scale(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grade_scales::delete_grade_scale(self, id, request).await
    }

    pub async fn resolve_grade(
        &self,
        query: ResolveGradeQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grade_scales::resolve_grade(self, query, request).await
    }

    // 成绩记录
    pub async fn list_exam_records(
        &self,
        query: ExamRecordListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        exam_records::list_exam_records(self, query, request).await
    }

    pub async fn list_my_exam_records(
        &self,
        pagination: PaginationQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        exam_records::list_my_exam_records(self, pagination, request).await
    }

    pub async fn create_exam_record(
        &self,
        body: ExamRecordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        exam_records::create_exam_record(self, body, request).await
    }

    pub async fn get_exam_record(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        exam_records::get_exam_record(self, id, request).await
    }

    pub async fn replace_exam_record(
        &self,
        id: i64,
        body: ExamRecordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        exam_records::replace_exam_record(self, id, body, request).await
    }

    pub async fn patch_exam_record(
        &self,
        id: i64,
        body: PatchExamRecordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        exam_records::patch_exam_record(self, id, body, request).await
    }

    pub async fn delete_exam_record(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        exam_records::delete_exam_record(self, id, request).await
    }

    // 录入成绩时的下拉数据
    pub async fn classroom_students(
        &self,
        classroom_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        lookups::classroom_students(self, classroom_id, request).await
    }

    pub async fn student_subjects(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        lookups::student_subjects(self, student_id, request).await
    }
}

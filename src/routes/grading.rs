use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::common::PaginationQuery;
use crate::models::grading::requests::{
    CreateExamTypeRequest, ExamRecordListParams, ExamRecordRequest, GradeScaleRequest,
    PatchExamRecordRequest, PatchGradeScaleRequest, ResolveGradeQuery,
};
use crate::models::users::entities::UserRole;
use crate::services::GradingService;
use crate::utils::{SafeClassroomIdI64, SafeIDI64, SafeUserIdI64};

static GRADING_SERVICE: Lazy<GradingService> = Lazy::new(GradingService::new_lazy);

// 考试类型
pub async fn list_exam_types(req: HttpRequest) -> ActixResult<HttpResponse> {
    GRADING_SERVICE.list_exam_types(&req).await
}

pub async fn create_exam_type(
    req: HttpRequest,
    body: web::Json<CreateExamTypeRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .create_exam_type(body.into_inner(), &req)
        .await
}

pub async fn delete_exam_type(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    GRADING_SERVICE.delete_exam_type(id.0, &req).await
}

// 等级
pub async fn list_grade_scales(req: HttpRequest) -> ActixResult<HttpResponse> {
    GRADING_SERVICE.list_grade_scales(&req).await
}

pub async fn create_grade_scale(
    req: HttpRequest,
    body: web::Json<GradeScaleRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .create_grade_scale(body.into_inner(), &req)
        .await
}

pub async fn resolve_grade(
    req: HttpRequest,
    query: web::Query<ResolveGradeQuery>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE.resolve_grade(query.into_inner(), &req).await
}

pub async fn get_grade_scale(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    GRADING_SERVICE.get_grade_scale(id.0, &req).await
}

pub async fn update_grade_scale(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<GradeScaleRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .update_grade_scale(id.0, body.into_inner(), &req)
        .await
}

pub async fn patch_grade_scale(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<PatchGradeScaleRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .patch_grade_scale(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_grade_scale(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    GRADING_SERVICE.delete_grade_scale(id.0, &req).await
}

// 成绩记录
pub async fn list_exam_records(
    req: HttpRequest,
    query: web::Query<ExamRecordListParams>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .list_exam_records(query.into_inner(), &req)
        .await
}

pub async fn list_my_exam_records(
    req: HttpRequest,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .list_my_exam_records(query.into_inner(), &req)
        .await
}

pub async fn create_exam_record(
    req: HttpRequest,
    body: web::Json<ExamRecordRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .create_exam_record(body.into_inner(), &req)
        .await
}

pub async fn get_exam_record(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    GRADING_SERVICE.get_exam_record(id.0, &req).await
}

pub async fn replace_exam_record(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<ExamRecordRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .replace_exam_record(id.0, body.into_inner(), &req)
        .await
}

pub async fn patch_exam_record(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<PatchExamRecordRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .patch_exam_record(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_exam_record(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    GRADING_SERVICE.delete_exam_record(id.0, &req).await
}

pub async fn classroom_students(
    req: HttpRequest,
    classroom_id: SafeClassroomIdI64,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .classroom_students(classroom_id.0, &req)
        .await
}

pub async fn student_subjects(
    req: HttpRequest,
    user_id: SafeUserIdI64,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE.student_subjects(user_id.0, &req).await
}

// 配置路由
pub fn configure_grading_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grading")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/exam-types")
                    .route(web::get().to(list_exam_types))
                    .route(
                        web::post()
                            .to(create_exam_type)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::resource("/exam-types/{id}")
                    .route(web::delete().to(delete_exam_type))
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            )
            .service(
                web::resource("/grades")
                    .route(web::get().to(list_grade_scales))
                    .route(
                        web::post()
                            .to(create_grade_scale)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            // 必须在 /grades/{id} 之前
            .route("/grades/resolve", web::get().to(resolve_grade))
            .service(
                web::resource("/grades/{id}")
                    .route(web::get().to(get_grade_scale))
                    .route(
                        web::put()
                            .to(update_grade_scale)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::patch()
                            .to(patch_grade_scale)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_grade_scale)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::resource("/exams")
                    .route(web::get().to(list_exam_records))
                    .route(web::post().to(create_exam_record))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .route("/exams/my", web::get().to(list_my_exam_records))
            .service(
                web::resource("/exams/{id}")
                    // 学生只能看到自己的记录，在业务层过滤
                    .route(web::get().to(get_exam_record))
                    .route(
                        web::put()
                            .to(replace_exam_record)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::patch()
                            .to(patch_exam_record)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_exam_record)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/classrooms/{classroom_id}/students")
                    .route(web::get().to(classroom_students))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::resource("/students/{user_id}/subjects")
                    .route(web::get().to(student_subjects))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            ),
    );
}

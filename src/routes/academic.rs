use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::academic::requests::{
    AssignSubjectRequest, ClassroomListParams, CreateClassroomRequest, CreateSubjectRequest,
    EnrollStudentRequest, EnrollmentListParams, UpdateClassroomRequest, UpdateSubjectRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AcademicService;
use crate::utils::{SafeClassroomIdI64, SafeIDI64, SafeUserIdI64};

static ACADEMIC_SERVICE: Lazy<AcademicService> = Lazy::new(AcademicService::new_lazy);

// 班级
pub async fn list_classrooms(
    req: HttpRequest,
    query: web::Query<ClassroomListParams>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .list_classrooms(query.into_inner(), &req)
        .await
}

pub async fn create_classroom(
    req: HttpRequest,
    body: web::Json<CreateClassroomRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .create_classroom(body.into_inner(), &req)
        .await
}

pub async fn get_classroom(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.get_classroom(id.0, &req).await
}

pub async fn get_classroom_details(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.get_classroom_details(id.0, &req).await
}

pub async fn update_classroom(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateClassroomRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .update_classroom(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_classroom(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.delete_classroom(id.0, &req).await
}

pub async fn list_classroom_subjects(
    req: HttpRequest,
    classroom_id: SafeClassroomIdI64,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .list_classroom_subjects(classroom_id.0, &req)
        .await
}

// 科目
pub async fn list_subjects(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_subjects(&req).await
}

pub async fn create_subject(
    req: HttpRequest,
    body: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .create_subject(body.into_inner(), &req)
        .await
}

pub async fn get_subject(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.get_subject(id.0, &req).await
}

pub async fn update_subject(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .update_subject(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_subject(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.delete_subject(id.0, &req).await
}

// 分配与入班
pub async fn assign_subject(
    req: HttpRequest,
    body: web::Json<AssignSubjectRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .assign_subject(body.into_inner(), &req)
        .await
}

pub async fn enroll_student(
    req: HttpRequest,
    body: web::Json<EnrollStudentRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .enroll_student(body.into_inner(), &req)
        .await
}

pub async fn list_enrollments(
    req: HttpRequest,
    query: web::Query<EnrollmentListParams>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .list_enrollments(query.into_inner(), &req)
        .await
}

pub async fn my_subjects(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.my_subjects(&req).await
}

pub async fn student_subjects(
    req: HttpRequest,
    user_id: SafeUserIdI64,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.student_subjects(user_id.0, &req).await
}

// 配置路由
pub fn configure_academic_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/academic")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/classrooms")
                    .route(web::get().to(list_classrooms))
                    .route(
                        web::post()
                            .to(create_classroom)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::resource("/classrooms/{id}")
                    .route(web::get().to(get_classroom))
                    .route(
                        web::put()
                            .to(update_classroom)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_classroom)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::resource("/classrooms/{id}/details")
                    .route(web::get().to(get_classroom_details))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .route(
                "/classrooms/{classroom_id}/subjects",
                web::get().to(list_classroom_subjects),
            )
            .service(
                web::resource("/subjects")
                    .route(web::get().to(list_subjects))
                    .route(
                        web::post()
                            .to(create_subject)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::resource("/subjects/{id}")
                    .route(web::get().to(get_subject))
                    .route(
                        web::put()
                            .to(update_subject)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_subject)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::resource("/classroom-subjects")
                    .route(web::post().to(assign_subject))
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            )
            .service(
                web::resource("/enrollments")
                    .route(
                        web::get()
                            .to(list_enrollments)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::post()
                            .to(enroll_student)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            // 先注册 /me，避免被 {user_id} 吞掉
            .route("/student-subjects/me", web::get().to(my_subjects))
            .service(
                web::resource("/student-subjects/{user_id}")
                    .route(web::get().to(student_subjects))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            ),
    );
}

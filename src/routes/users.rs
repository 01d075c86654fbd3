use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{AssignRoleRequest, RegisterStudentRequest, UserListParams};
use crate::services::UserService;
use crate::utils::SafeIDI64;

// 懒加载的全局 UserService 实例
static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);

pub async fn list_users(
    req: HttpRequest,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_users(query.into_inner(), &req).await
}

pub async fn list_unassigned(req: HttpRequest) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_unassigned(&req).await
}

pub async fn count_by_role(req: HttpRequest) -> ActixResult<HttpResponse> {
    USER_SERVICE.count_by_role(&req).await
}

pub async fn list_by_role(req: HttpRequest, role: web::Path<String>) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_by_role(&role.into_inner(), &req).await
}

pub async fn register_student(
    req: HttpRequest,
    body: web::Json<RegisterStudentRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.register_student(body.into_inner(), &req).await
}

pub async fn get_user(req: HttpRequest, user_id: SafeIDI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.get_user(user_id.0, &req).await
}

pub async fn assign_role(
    req: HttpRequest,
    user_id: SafeIDI64,
    body: web::Json<AssignRoleRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .assign_role(user_id.0, body.into_inner(), &req)
        .await
}

pub async fn toggle_block(req: HttpRequest, user_id: SafeIDI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.toggle_block(user_id.0, &req).await
}

pub async fn delete_user(req: HttpRequest, user_id: SafeIDI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.delete_user(user_id.0, &req).await
}

// 配置路由
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_users))
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            )
            .service(
                web::resource("/unassigned")
                    .route(web::get().to(list_unassigned))
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            )
            .service(
                web::resource("/counts")
                    .route(web::get().to(count_by_role))
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            )
            // 教师也需要按角色选人（例如选择学生）
            .service(
                web::resource("/by-role/{role}")
                    .route(web::get().to(list_by_role))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            // 以下仅校长
            .service(
                web::resource("/students")
                    .route(web::post().to(register_student))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_user)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_user)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/role")
                    .route(web::put().to(assign_role))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .service(
                web::resource("/{id}/toggle-block")
                    .route(web::post().to(toggle_block))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            ),
    );
}

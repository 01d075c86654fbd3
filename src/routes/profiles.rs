use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::profiles::requests::UpsertProfileRequest;
use crate::services::ProfileService;
use crate::utils::SafeUserIdI64;

static PROFILE_SERVICE: Lazy<ProfileService> = Lazy::new(ProfileService::new_lazy);

pub async fn get_my_profile(req: HttpRequest) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.get_my_profile(&req).await
}

pub async fn upsert_my_profile(
    req: HttpRequest,
    body: web::Json<UpsertProfileRequest>,
) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE
        .upsert_my_profile(body.into_inner(), &req)
        .await
}

pub async fn get_profile(req: HttpRequest, user_id: SafeUserIdI64) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.get_profile(user_id.0, &req).await
}

// 配置路由
pub fn configure_profile_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/profiles")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/me")
                    .route(web::get().to(get_my_profile))
                    .route(web::put().to(upsert_my_profile)),
            )
            // 字段可见性在业务层裁剪
            .route("/{user_id}", web::get().to(get_profile)),
    );
}

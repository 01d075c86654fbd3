/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <access token>`，通过后把当前 [`User`] 放进请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/v1/users")
 *     .wrap(RequireJWT)
 *     .route("/{id}", web::get().to(get_user))
 * ```
 *
 * 已认证用户按 `user:{id}` 缓存；角色变更、封禁和删除会清掉对应条目。
 * 被封禁或停用的账号返回 403。
 */

use crate::cache::{self, ObjectCache};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::{User, UserRole, UserStatus};
use crate::storage::Storage;
use crate::utils::jwt::{JwtUtils, TokenKind};
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RequireJWT;

/// 认证失败时的状态码、错误码和提示
struct Rejection(StatusCode, ErrorCode, &'static str);

impl Rejection {
    fn unauthorized(message: &'static str) -> Self {
        Self(StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, message)
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<User, Rejection> {
    let token = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| Rejection::unauthorized("Missing or invalid Authorization header"))?;

    let (Some(config), Some(storage), Some(object_cache)) = (
        req.app_data::<web::Data<AppConfig>>(),
        req.app_data::<web::Data<Arc<dyn Storage>>>(),
        req.app_data::<web::Data<Arc<dyn ObjectCache>>>(),
    ) else {
        error!("认证中间件缺少 app_data（配置、存储或缓存）");
        return Err(Rejection(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
            "Internal server error",
        ));
    };

    let object_cache: &dyn ObjectCache = object_cache.get_ref().as_ref();

    let claims = JwtUtils::verify(&config.jwt, token, TokenKind::Access).map_err(|err| {
        info!("JWT 校验失败: {}", err);
        Rejection::unauthorized("Invalid or expired token")
    })?;
    let user_id = claims
        .user_id()
        .ok_or_else(|| Rejection::unauthorized("Invalid or expired token"))?;

    let key = cache::user_cache_key(user_id);
    let user = match cache::get_json::<User>(object_cache, &key).await {
        Some(user) => user,
        None => {
            let user = storage
                .get_user_by_id(user_id)
                .await
                .map_err(|e| {
                    error!("加载用户 {} 失败: {}", user_id, e);
                    Rejection(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::InternalServerError,
                        "Internal server error",
                    )
                })?
                .ok_or_else(|| Rejection::unauthorized("User not found"))?;
            cache::insert_json(
                object_cache,
                key,
                &user,
                config.cache.default_ttl,
            )
            .await;
            user
        }
    };

    match user.status {
        UserStatus::Active => Ok(user),
        UserStatus::Suspended => Err(Rejection(
            StatusCode::FORBIDDEN,
            ErrorCode::AccountBlocked,
            "Account is suspended",
        )),
        UserStatus::Inactive => Err(Rejection(
            StatusCode::FORBIDDEN,
            ErrorCode::AccountBlocked,
            "Account is inactive",
        )),
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match authenticate(&req).await {
                Ok(user) => {
                    debug!("用户 {} 通过 JWT 认证", user.id);
                    req.extensions_mut().insert(user);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(Rejection(status, code, message)) => {
                    info!("{} 认证失败: {}", req.path(), message);
                    Ok(req.into_response(
                        create_error_response(status, code, message).map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 当前用户，只在 RequireJWT 保护的路由里有值
    pub fn extract_user_claims(req: &HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }

    pub fn extract_user_role(req: &HttpRequest) -> Option<UserRole> {
        req.extensions().get::<User>().map(|user| user.role)
    }

    pub fn has_any_role(req: &HttpRequest, roles: &[&UserRole]) -> bool {
        Self::extract_user_role(req).is_some_and(|role| roles.contains(&&role))
    }
}

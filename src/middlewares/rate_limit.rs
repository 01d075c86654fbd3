/*!
 * 速率限制中间件
 *
 * 固定窗口计数：同一个键（前缀 + 用户 ID 或客户端 IP）在窗口内超过上限返回 429，
 * 响应头带 `Retry-After`；放行的响应带 `X-RateLimit-Limit` / `X-RateLimit-Remaining`。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

/// 值为（窗口开始时间，窗口内计数）
static RATE_LIMIT_WINDOWS: Lazy<Cache<String, (Instant, u32)>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(600))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window: Duration,
    key_prefix: &'static str,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64, key_prefix: &'static str) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
            key_prefix,
        }
    }

    /// 5 次/分钟
    pub fn login() -> Self {
        Self::new(5, 60, "login")
    }

    /// 3 次/分钟
    pub fn register() -> Self {
        Self::new(3, 60, "register")
    }

    pub fn refresh_token() -> Self {
        Self::new(10, 60, "refresh")
    }

    pub fn file_upload() -> Self {
        Self::new(10, 60, "upload")
    }
}

/// 窗口判定结果
#[derive(Debug, PartialEq, Eq)]
enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: u64 },
}

async fn check(key: String, max_requests: u32, window: Duration, now: Instant) -> Decision {
    let (start, count) = match RATE_LIMIT_WINDOWS.get(&key).await {
        Some((start, count)) if now.duration_since(start) < window => (start, count),
        _ => (now, 0),
    };

    if count >= max_requests {
        let elapsed = now.duration_since(start);
        let retry_after = window.saturating_sub(elapsed).as_secs().max(1);
        return Decision::Limited { retry_after };
    }

    RATE_LIMIT_WINDOWS.insert(key, (start, count + 1)).await;
    Decision::Allowed {
        remaining: max_requests - count - 1,
    }
}

/// 取客户端 IP；转发头只在连接地址不可用时参考
fn client_ip(req: &ServiceRequest) -> String {
    let from_conn = req
        .connection_info()
        .realip_remote_addr()
        .map(str::to_string)
        .filter(|ip| ip.parse::<IpAddr>().is_ok());
    if let Some(ip) = from_conn {
        return ip;
    }

    req.headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| ip.parse::<IpAddr>().is_ok())
        .map(str::to_string)
        .unwrap_or_else(|| "unknown".to_string())
}

fn limited_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let limit = self.limit.clone();

        Box::pin(async move {
            let identity = req
                .extensions()
                .get::<User>()
                .map(|user| format!("user:{}", user.id))
                .unwrap_or_else(|| format!("ip:{}", client_ip(&req)));
            let key = format!("{}:{}", limit.key_prefix, identity);

            match check(key.clone(), limit.max_requests, limit.window, Instant::now()).await {
                Decision::Limited { retry_after } => {
                    warn!("触发速率限制: {}", key);
                    Ok(req.into_response(limited_response(retry_after).map_into_right_body()))
                }
                Decision::Allowed { remaining } => {
                    let mut res = srv.call(req).await?;
                    let headers = res.headers_mut();
                    headers.insert(
                        HeaderName::from_static("x-ratelimit-limit"),
                        HeaderValue::from(limit.max_requests),
                    );
                    headers.insert(
                        HeaderName::from_static("x-ratelimit-remaining"),
                        HeaderValue::from(remaining),
                    );
                    Ok(res.map_into_left_body())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window, Duration::from_secs(60));
        assert_eq!(login.key_prefix, "login");

        assert_eq!(RateLimit::register().max_requests, 3);
        assert_eq!(RateLimit::file_upload().max_requests, 10);
    }

    #[tokio::test]
    async fn test_window_blocks_then_resets() {
        let window = Duration::from_secs(60);
        let start = Instant::now();
        let key = "test:ip:203.0.113.9".to_string();

        assert_eq!(
            check(key.clone(), 2, window, start).await,
            Decision::Allowed { remaining: 1 }
        );
        assert_eq!(
            check(key.clone(), 2, window, start).await,
            Decision::Allowed { remaining: 0 }
        );
        assert!(matches!(
            check(key.clone(), 2, window, start + Duration::from_secs(10)).await,
            Decision::Limited { retry_after: 50 }
        ));

        // 窗口过后重新计数
        assert_eq!(
            check(key, 2, window, start + Duration::from_secs(61)).await,
            Decision::Allowed { remaining: 1 }
        );
    }
}

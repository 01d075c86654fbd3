//! 路径参数提取器
//!
//! `define_safe_i64_extractor!` 生成的类型既可以直接作为 handler 参数，
//! 也可以放进 `web::Path<(A, B)>` 里按位置反序列化。

use actix_web::{HttpRequest, HttpResponse, error::InternalError};

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(message: String) -> actix_web::Error {
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

/// 解析正整数 ID
pub fn parse_positive_i64(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

pub fn path_i64(req: &HttpRequest, param: &str) -> Result<i64, actix_web::Error> {
    let raw = req
        .match_info()
        .get(param)
        .ok_or_else(|| bad_request(format!("Missing path parameter '{param}'")))?;
    parse_positive_i64(raw)
        .ok_or_else(|| bad_request(format!("Invalid path parameter '{param}': {raw}")))
}

#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = std::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                std::future::ready($crate::utils::extractor::path_i64(req, $param).map($name))
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                $crate::utils::extractor::parse_positive_i64(&raw)
                    .map($name)
                    .ok_or_else(|| {
                        serde::de::Error::custom(format!(
                            "Invalid path parameter '{}': {}",
                            $param, raw
                        ))
                    })
            }
        }
    };
}

define_safe_i64_extractor!(SafeIDI64, "id");
define_safe_i64_extractor!(SafeClassroomIdI64, "classroom_id");
define_safe_i64_extractor!(SafeUserIdI64, "user_id");

/// 文件下载令牌，只接受字母、数字和连字符
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeFileToken(pub String);

impl SafeFileToken {
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = !raw.is_empty()
            && raw.len() <= 64
            && raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        valid.then(|| Self(raw.to_string()))
    }
}

impl actix_web::FromRequest for SafeFileToken {
    type Error = actix_web::Error;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let raw = req.match_info().get("token").unwrap_or_default();
        std::future::ready(
            Self::parse(raw).ok_or_else(|| bad_request(format!("Invalid file token: {raw}"))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{FromRequest, test::TestRequest};

    #[actix_web::test]
    async fn test_id_from_path() {
        let req = TestRequest::default()
            .param("id", "17")
            .to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 17);

        let req = TestRequest::default()
            .param("id", "-3")
            .to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());

        let req = TestRequest::default()
            .param("id", "abc")
            .to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());
    }

    #[test]
    fn test_deserialize_inside_tuple() {
        let pair: (SafeIDI64, SafeIDI64) =
            serde_json::from_str(r#"["4", "9"]"#).unwrap();
        assert_eq!(pair.0.0, 4);
        assert_eq!(pair.1.0, 9);
    }

    #[test]
    fn test_file_token_charset() {
        assert!(SafeFileToken::parse("0b6c1f1e-9a3d-4c55-8f0e-1b2a3c4d5e6f").is_some());
        assert!(SafeFileToken::parse("../etc/passwd").is_none());
        assert!(SafeFileToken::parse("").is_none());
    }
}

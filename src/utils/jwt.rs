use crate::config::JwtConfig;
use crate::models::users::entities::UserRole;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // 用户 ID
    pub role: UserRole,
    pub kind: TokenKind,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// access token 有效期（秒）
    pub expires_in: i64,
}

pub struct JwtUtils;

impl JwtUtils {
    pub fn issue(
        config: &JwtConfig,
        user_id: i64,
        role: UserRole,
        kind: TokenKind,
        lifetime: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            kind,
            exp: (now + lifetime).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
    }

    pub fn issue_access(
        config: &JwtConfig,
        user_id: i64,
        role: UserRole,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        Self::issue(
            config,
            user_id,
            role,
            TokenKind::Access,
            chrono::Duration::minutes(config.access_token_expiry),
        )
    }

    /// 勾选“记住我”时 refresh token 使用更长的有效期
    pub fn refresh_lifetime_days(config: &JwtConfig, remember_me: bool) -> i64 {
        if remember_me {
            config.refresh_token_remember_me_expiry
        } else {
            config.refresh_token_expiry
        }
    }

    pub fn issue_pair(
        config: &JwtConfig,
        user_id: i64,
        role: UserRole,
        remember_me: bool,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        let access_token = Self::issue_access(config, user_id, role)?;
        let refresh_token = Self::issue(
            config,
            user_id,
            role,
            TokenKind::Refresh,
            chrono::Duration::days(Self::refresh_lifetime_days(config, remember_me)),
        )?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: config.access_token_expiry * 60,
        })
    }

    /// 校验签名、过期时间和 token 类型
    pub fn verify(
        config: &JwtConfig,
        token: &str,
        expected: TokenKind,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.secret.as_bytes()),
            &Validation::default(),
        )?
        .claims;

        if claims.kind != expected || claims.user_id().is_none() {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    pub fn refresh_token_cookie(
        token: &str,
        lifetime_days: i64,
        secure: bool,
    ) -> Cookie<'static> {
        Cookie::build(REFRESH_TOKEN_COOKIE, token.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::days(lifetime_days))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(secure)
            .finish()
    }

    /// 注销时覆盖掉浏览器里的 refresh token
    pub fn expired_refresh_token_cookie(secure: bool) -> Cookie<'static> {
        Cookie::build(REFRESH_TOKEN_COOKIE, "")
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(secure)
            .finish()
    }

    pub fn refresh_token_from(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-secret".to_string(),
            access_token_expiry: 15,
            refresh_token_expiry: 7,
            refresh_token_remember_me_expiry: 30,
        }
    }

    #[test]
    fn test_pair_verifies_with_matching_kind() {
        let config = config();
        let pair = JwtUtils::issue_pair(&config, 42, UserRole::Teacher, false).unwrap();
        assert_eq!(pair.expires_in, 900);

        let claims = JwtUtils::verify(&config, &pair.access_token, TokenKind::Access).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role, UserRole::Teacher);

        assert!(JwtUtils::verify(&config, &pair.access_token, TokenKind::Refresh).is_err());
        assert!(JwtUtils::verify(&config, &pair.refresh_token, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn test_wrong_secret_and_expired_rejected() {
        let config = config();
        let token = JwtUtils::issue_access(&config, 1, UserRole::Student).unwrap();

        let other = JwtConfig {
            secret: "another-secret".to_string(),
            ..config.clone()
        };
        assert!(JwtUtils::verify(&other, &token, TokenKind::Access).is_err());

        let expired = JwtUtils::issue(
            &config,
            1,
            UserRole::Student,
            TokenKind::Access,
            chrono::Duration::minutes(-10),
        )
        .unwrap();
        assert!(JwtUtils::verify(&config, &expired, TokenKind::Access).is_err());
    }

    #[test]
    fn test_remember_me_lifetime() {
        let config = config();
        assert_eq!(JwtUtils::refresh_lifetime_days(&config, false), 7);
        assert_eq!(JwtUtils::refresh_lifetime_days(&config, true), 30);
    }
}

use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // 用户 ID
    pub email: String,      // 用户邮箱
    pub token_type: String, // "access" 或 "refresh"
    pub exp: usize,         // 过期时间戳
    pub iat: usize,         // 签发时间戳
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
    /// access token 过期时间
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

pub struct JwtUtils;

impl JwtUtils {
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    pub fn access_token_ttl() -> chrono::Duration {
        chrono::Duration::minutes(AppConfig::get().jwt.access_token_expiry)
    }

    pub fn refresh_token_ttl() -> chrono::Duration {
        chrono::Duration::days(AppConfig::get().jwt.refresh_token_expiry)
    }

    pub fn generate_access_token(
        user_id: i64,
        email: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        Self::encode_with_secret(
            &Self::get_secret(),
            user_id,
            email,
            "access",
            Self::access_token_ttl(),
        )
    }

    pub fn generate_refresh_token(
        user_id: i64,
        email: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        Self::encode_with_secret(
            &Self::get_secret(),
            user_id,
            email,
            "refresh",
            Self::refresh_token_ttl(),
        )
    }

    pub fn generate_token_pair(
        user_id: i64,
        email: &str,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, email)?,
            refresh_token: Self::generate_refresh_token(user_id, email)?,
            expires_at: chrono::Utc::now() + Self::access_token_ttl(),
        })
    }

    fn encode_with_secret(
        secret: &str,
        user_id: i64,
        email: &str,
        token_type: &str,
        expiry: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            token_type: token_type.to_string(),
            exp: (now + expiry).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
    }

    fn decode_with_secret(
        secret: &str,
        token: &str,
        expected_type: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_ref()),
            &Validation::default(),
        )?
        .claims;

        if claims.token_type != expected_type {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::decode_with_secret(&Self::get_secret(), token, "access")
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::decode_with_secret(&Self::get_secret(), token, "refresh")
    }

    /// 使用 Refresh Token 换取新的 Access Token
    pub fn refresh_access_token(
        refresh_token: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Self::verify_refresh_token(refresh_token)?;
        let user_id = claims
            .user_id()
            .ok_or(jsonwebtoken::errors::ErrorKind::InvalidToken)?;
        Self::generate_access_token(user_id, &claims.email)
    }

    pub fn create_refresh_token_cookie(refresh_token: &str) -> Cookie<'static> {
        let config = AppConfig::get();
        Cookie::build(REFRESH_TOKEN_COOKIE, refresh_token.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::days(
                config.jwt.refresh_token_expiry,
            ))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(config.is_production())
            .finish()
    }

    /// 注销时用于清除 Cookie
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        let config = AppConfig::get();
        Cookie::build(REFRESH_TOKEN_COOKIE, "")
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(config.is_production())
            .finish()
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_type_is_enforced() {
        let access = JwtUtils::encode_with_secret(
            SECRET,
            7,
            "t@example.com",
            "access",
            chrono::Duration::minutes(5),
        )
        .unwrap();

        let claims = JwtUtils::decode_with_secret(SECRET, &access, "access").unwrap();
        assert_eq!(claims.user_id(), Some(7));
        assert_eq!(claims.email, "t@example.com");

        assert!(JwtUtils::decode_with_secret(SECRET, &access, "refresh").is_err());
        assert!(JwtUtils::decode_with_secret("other-secret", &access, "access").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let expired = JwtUtils::encode_with_secret(
            SECRET,
            7,
            "t@example.com",
            "access",
            chrono::Duration::minutes(-10),
        )
        .unwrap();
        assert!(JwtUtils::decode_with_secret(SECRET, &expired, "access").is_err());
    }

    #[test]
    fn test_refresh_flow_with_configured_secret() {
        let pair = JwtUtils::generate_token_pair(3, "r@example.com").unwrap();
        assert!(pair.expires_at > chrono::Utc::now());
        let access = JwtUtils::refresh_access_token(&pair.refresh_token).unwrap();
        let claims = JwtUtils::verify_access_token(&access).unwrap();
        assert_eq!(claims.user_id(), Some(3));
        assert!(JwtUtils::refresh_access_token(&pair.access_token).is_err());
    }
}

/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>`，并把当前导师写入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/students")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_students))
 *
 * async fn list_students(req: HttpRequest) -> Result<HttpResponse> {
 *     let user_id = RequireJWT::extract_user_id(&req);
 *     // ...
 * }
 * ```
 *
 * ## 认证流程
 *
 * 1. 缺少令牌返回 401 "Access token required"
 * 2. 令牌无效或过期返回 401 "Invalid token"
 * 3. 先查缓存中的用户，未命中再查存储，用户必须处于 active 状态
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::middlewares::create_error_response;
use crate::models::{ErrorCode, users::entities::User};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RequireJWT;

/// 认证失败的原因
#[derive(Debug, PartialEq)]
enum AuthFailure {
    MissingToken,
    InvalidToken,
    Inactive,
    Internal(String),
}

impl AuthFailure {
    fn into_parts(self) -> (StatusCode, ErrorCode, String) {
        match self {
            AuthFailure::MissingToken => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                "Access token required".to_string(),
            ),
            AuthFailure::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                "Invalid token".to_string(),
            ),
            AuthFailure::Inactive => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                "User is not active".to_string(),
            ),
            AuthFailure::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                msg,
            ),
        }
    }
}

/// 用户缓存键
pub fn user_cache_key(user_id: i64) -> String {
    format!("user:{user_id}")
}

/// 取出 Bearer 令牌，空令牌视为缺失
fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

async fn authenticate(req: &ServiceRequest) -> Result<User, AuthFailure> {
    let token = bearer_token(req).ok_or(AuthFailure::MissingToken)?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        debug!("JWT token validation failed: {}", err);
        AuthFailure::InvalidToken
    })?;
    let user_id = claims.user_id().ok_or(AuthFailure::InvalidToken)?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|c| c.get_ref().clone());

    if let Some(cache) = &cache {
        match cache.get_raw(&user_cache_key(user_id)).await {
            CacheResult::Found(json) => match serde_json::from_str::<User>(&json) {
                Ok(user) if user.is_active() => return Ok(user),
                _ => cache.remove(&user_cache_key(user_id)).await,
            },
            CacheResult::NotFound => debug!("User {} not cached", user_id),
            CacheResult::ExistsButNoValue => debug!("Cache backend unavailable, using storage"),
        }
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|s| s.get_ref().clone())
        .ok_or_else(|| AuthFailure::Internal("Storage not configured".to_string()))?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| {
            error!("Failed to load user {}: {}", user_id, e);
            AuthFailure::Internal("Failed to retrieve user".to_string())
        })?
        .ok_or(AuthFailure::InvalidToken)?;

    if !user.is_active() {
        return Err(AuthFailure::Inactive);
    }

    if let Some(cache) = &cache
        && let Ok(user_json) = serde_json::to_string(&user)
    {
        cache.insert_raw(user_cache_key(user_id), user_json, 0).await;
    }

    Ok(user)
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
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(failure) => {
                    let (status, code, message) = failure.into_parts();
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        message
                    );
                    Ok(req.into_response(
                        create_error_response(status, code, &message).map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中取出当前用户
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }

    /// 清除缓存中的用户，下一次请求会重新从存储读取
    pub async fn evict_cached_user(req: &actix_web::HttpRequest, user_id: i64) {
        if let Some(cache) = req.app_data::<web::Data<Arc<dyn ObjectCache>>>() {
            cache.remove(&user_cache_key(user_id)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_support::memory_storage;
    use actix_web::{App, HttpRequest, HttpResponse, test};

    async fn whoami(req: HttpRequest) -> HttpResponse {
        let id = RequireJWT::extract_user_id(&req).unwrap_or_default();
        HttpResponse::Ok().body(id.to_string())
    }

    async fn app_parts() -> (SeaOrmStorage, Arc<dyn Storage>, Arc<dyn ObjectCache>) {
        let storage = memory_storage().await;
        let shared: Arc<dyn Storage> = Arc::new(storage.clone());
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::new(100, 60));
        (storage, shared, cache)
    }

    #[actix_web::test]
    async fn test_missing_and_invalid_token() {
        let (_, storage, cache) = app_parts().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .app_data(web::Data::new(cache))
                .service(web::scope("/api").wrap(RequireJWT).route("/me", web::get().to(whoami))),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Access token required");

        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid token");
    }

    #[actix_web::test]
    async fn test_valid_token_resolves_user_and_caches_it() {
        let (raw, storage, cache) = app_parts().await;
        let user = raw
            .create_user_impl("t@example.com", "hash", serde_json::json!({}))
            .await
            .unwrap();
        let token = JwtUtils::generate_access_token(user.id, &user.email).unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .app_data(web::Data::new(cache.clone()))
                .service(web::scope("/api").wrap(RequireJWT).route("/me", web::get().to(whoami))),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(body, user.id.to_string());

        assert!(matches!(
            cache.get_raw(&user_cache_key(user.id)).await,
            CacheResult::Found(_)
        ));
    }
}

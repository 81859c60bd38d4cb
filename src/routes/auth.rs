use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::auth::requests::{
    LoginRequest, RefreshTokenRequest, SignupRequest, UpdateProfileRequest,
};
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn signup(
    req: HttpRequest,
    signup_data: web::Json<SignupRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.signup(signup_data.into_inner(), &req).await
}

pub async fn login(
    req: HttpRequest,
    login_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(login_data.into_inner(), &req).await
}

// 只带 Cookie 时请求体可以为空
pub async fn refresh_token(
    req: HttpRequest,
    refresh_data: Option<web::Json<RefreshTokenRequest>>,
) -> ActixResult<HttpResponse> {
    let refresh_data = refresh_data.map(web::Json::into_inner).unwrap_or_default();
    AUTH_SERVICE.refresh_token(refresh_data, &req).await
}

pub async fn logout(req: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.logout(&req).await
}

pub async fn get_profile(req: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.get_profile(&req).await
}

pub async fn update_profile(
    req: HttpRequest,
    profile_data: web::Json<UpdateProfileRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .update_profile(profile_data.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/signup")
            .wrap(RateLimit::signup())
            .route(web::post().to(signup)),
    )
    .service(
        web::resource("/api/login")
            .wrap(RateLimit::login())
            .route(web::post().to(login)),
    )
    .service(
        web::resource("/api/refresh")
            .wrap(RateLimit::refresh_token())
            .route(web::post().to(refresh_token)),
    )
    .service(
        web::resource("/api/logout")
            .wrap(middlewares::RequireJWT)
            .route(web::post().to(logout)),
    )
    .service(
        web::resource("/api/profile")
            .wrap(middlewares::RequireJWT)
            .route(web::get().to(get_profile))
            .route(web::put().to(update_profile)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheResult;
    use crate::middlewares::require_jwt::user_cache_key;
    use crate::services::test_support::{Faults, TestState};
    use crate::utils::jwt::REFRESH_TOKEN_COOKIE;
    use actix_web::{App, test};
    use serde_json::json;

    #[actix_web::test]
    async fn test_signup_login_and_profile() {
        let state = TestState::new().await;
        let app = test::init_service(
            App::new()
                .app_data(state.storage_data())
                .app_data(state.cache_data())
                .configure(configure_auth_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/signup")
            .set_json(json!({"email": "mia.tutor@example.com", "password": "secret1"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["user"]["email"], "mia.tutor@example.com");

        let req = test::TestRequest::post()
            .uri("/api/signup")
            .set_json(json!({"email": "mia.tutor@example.com", "password": "secret1"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 409);

        let req = test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({"email": "mia.tutor@example.com", "password": "wrong-pass"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);

        let req = test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({"email": "mia.tutor@example.com", "password": "secret1"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let access_token = body["data"]["session"]["access_token"]
            .as_str()
            .unwrap()
            .to_string();

        let req = test::TestRequest::get()
            .uri("/api/profile")
            .insert_header(("Authorization", format!("Bearer {access_token}")))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["email"], "mia.tutor@example.com");
    }

    #[actix_web::test]
    async fn test_signup_validation() {
        let state = TestState::new().await;
        let app = test::init_service(
            App::new()
                .app_data(state.storage_data())
                .configure(configure_auth_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/signup")
            .set_json(json!({"email": "short@example.com", "password": "123"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);

        let req = test::TestRequest::post()
            .uri("/api/signup")
            .set_json(json!({"password": "secret1"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);
    }

    #[actix_web::test]
    async fn test_profile_requires_token() {
        let state = TestState::new().await;
        let app = test::init_service(
            App::new()
                .app_data(state.storage_data())
                .app_data(state.cache_data())
                .configure(configure_auth_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/profile").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Access token required");

        let req = test::TestRequest::put()
            .uri("/api/profile")
            .insert_header(state.bearer())
            .set_json(json!({"user_metadata": {"display_name": "Ms. Rivera"}}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["user_metadata"]["display_name"], "Ms. Rivera");

        let req = test::TestRequest::post()
            .uri("/api/refresh")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);
    }

    #[actix_web::test]
    async fn test_logout_evicts_user_and_clears_cookie() {
        let state = TestState::new().await;
        let app = test::init_service(
            App::new()
                .app_data(state.storage_data())
                .app_data(state.cache_data())
                .configure(configure_auth_routes),
        )
        .await;

        // 访问受保护接口后用户进入缓存
        let req = test::TestRequest::get()
            .uri("/api/profile")
            .insert_header(state.bearer())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);
        assert!(matches!(
            state.cache.get_raw(&user_cache_key(state.user_id)).await,
            CacheResult::Found(_)
        ));

        let req = test::TestRequest::post()
            .uri("/api/logout")
            .insert_header(state.bearer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == REFRESH_TOKEN_COOKIE)
            .unwrap();
        assert_eq!(cookie.value(), "");
        assert_eq!(
            cookie.max_age(),
            Some(actix_web::cookie::time::Duration::ZERO)
        );

        assert!(matches!(
            state.cache.get_raw(&user_cache_key(state.user_id)).await,
            CacheResult::NotFound
        ));
    }

    #[actix_web::test]
    async fn test_concurrent_signup_conflict_is_409() {
        let state = TestState::new().await;
        // 预检查看不到已注册用户，插入时由唯一索引拦下
        let app = test::init_service(
            App::new()
                .app_data(state.faulty_storage_data(Faults {
                    hide_users_by_email: true,
                    ..Faults::default()
                }))
                .configure(configure_auth_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/signup")
            .set_json(json!({"email": "tutor@example.com", "password": "secret1"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 409);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Email already exists");
    }
}

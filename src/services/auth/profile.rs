use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::auth::requests::UpdateProfileRequest;
use crate::models::auth::responses::ProfileResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized;

use super::AuthService;

pub async fn handle_get_profile(request: &HttpRequest) -> ActixResult<HttpResponse> {
    match RequireJWT::extract_user_claims(request) {
        Some(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ProfileResponse::from(user),
            "Profile retrieved successfully",
        ))),
        None => Ok(unauthorized()),
    }
}

pub async fn handle_update_profile(
    service: &AuthService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    if !update_data.user_metadata.is_object() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "user_metadata must be a JSON object",
        )));
    }

    match storage
        .update_user_metadata(user_id, update_data.user_metadata)
        .await
    {
        Ok(Some(user)) => {
            // 缓存中的用户已过期
            RequireJWT::evict_cached_user(request, user_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ProfileResponse::from(user),
                "Profile updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserUpdateFailed,
                format!("Failed to update profile: {e}"),
            )),
        ),
    }
}

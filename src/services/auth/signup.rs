use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::TutorHubError;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{SignupRequest, SignupResponse, SignupUser},
};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{normalize_email, validate_email, validate_password};

use super::AuthService;

pub async fn handle_signup(
    service: &AuthService,
    signup_request: SignupRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let email = signup_request
        .email
        .as_deref()
        .map(normalize_email)
        .filter(|e| !e.is_empty());
    let password = signup_request.password.filter(|p| !p.is_empty());
    let (Some(email), Some(password)) = (email, password) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Email and password are required",
        )));
    };

    // 验证邮箱
    if let Err(msg) = validate_email(&email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }

    // 验证密码长度
    if let Err(msg) = validate_password(&password) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }

    let user_metadata = signup_request
        .user_metadata
        .unwrap_or_else(|| serde_json::json!({}));
    if !user_metadata.is_object() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "user_metadata must be a JSON object",
        )));
    }

    if let Err(response) = check_email_exists(&storage, &email).await {
        return Ok(response);
    }

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("Password hashing failed: {e}"),
                )),
            );
        }
    };

    match storage
        .create_user(&email, &password_hash, user_metadata)
        .await
    {
        Ok(user) => {
            tracing::info!("Tutor {} signed up", user.email);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                SignupResponse {
                    user: SignupUser {
                        id: user.id,
                        email: user.email,
                        created_at: user.created_at,
                    },
                },
                "Signup successful",
            )))
        }
        Err(TutorHubError::Conflict(_)) => Ok(email_taken()),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Signup failed: {e}"),
            )),
        ),
    }
}

fn email_taken() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::UserEmailAlreadyExists,
        "Email already exists",
    ))
}

async fn check_email_exists(storage: &Arc<dyn Storage>, email: &str) -> Result<(), HttpResponse> {
    match storage.get_user_by_email(email).await {
        Ok(Some(_)) => Err(email_taken()),
        Ok(None) => Ok(()),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Signup failed: {e}"),
            )),
        ),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnswerKeyService;
use crate::middlewares::RequireJWT;
use crate::models::answer_keys::requests::AnswerKeyQuery;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized;

pub async fn list_answer_keys(
    service: &AnswerKeyService,
    request: &HttpRequest,
    query: AnswerKeyQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(uploader_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    match storage.list_answer_keys(uploader_id, query).await {
        Ok(keys) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            keys,
            "Answer keys retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to fetch answer keys: {e}"),
            )),
        ),
    }
}

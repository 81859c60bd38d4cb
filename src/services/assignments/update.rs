use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, assignment_not_found, find_owned_assignment};
use crate::errors::TutorHubError;
use crate::middlewares::RequireJWT;
use crate::models::assignments::requests::UpdateAssignmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized;

pub async fn update_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    update_data: UpdateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    // 没有可更新字段时原样返回
    if update_data.is_empty() {
        return match find_owned_assignment(&storage, user_id, assignment_id).await {
            Ok(assignment) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                assignment,
                "Nothing to update",
            ))),
            Err(response) => Ok(response),
        };
    }

    if update_data
        .title
        .as_deref()
        .is_some_and(|t| t.trim().is_empty())
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Title cannot be empty",
        )));
    }

    match storage
        .update_assignment(user_id, assignment_id, update_data)
        .await
    {
        Ok(Some(assignment)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            assignment,
            "Assignment updated successfully",
        ))),
        Ok(None) => Ok(assignment_not_found()),
        Err(TutorHubError::NotFound(msg)) => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::AnswerKeyNotFound, msg),
        )),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update assignment: {e}"),
            )),
        ),
    }
}

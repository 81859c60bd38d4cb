use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, build_detail};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized;

pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    let assignments = match storage.list_assignments(user_id).await {
        Ok(assignments) => assignments,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to fetch assignments: {e}"),
                )),
            );
        }
    };

    let mut details = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        match build_detail(&storage, assignment).await {
            Ok(detail) => details.push(detail),
            Err(e) => return Ok(ApiResponse::from_error(&e)),
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        details,
        "Assignments retrieved successfully",
    )))
}

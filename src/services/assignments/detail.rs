use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, build_detail, find_owned_assignment};
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::services::unauthorized;

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    let assignment = match find_owned_assignment(&storage, user_id, assignment_id).await {
        Ok(assignment) => assignment,
        Err(response) => return Ok(response),
    };

    match build_detail(&storage, assignment).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Assignment retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

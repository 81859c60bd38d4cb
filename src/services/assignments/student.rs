use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, build_detail};
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::services::students::find_owned_student;
use crate::services::unauthorized;

pub async fn list_student_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    if let Err(response) = find_owned_student(&storage, user_id, student_id).await {
        return Ok(response);
    }

    let assignments = match storage.list_assignments_for_student(student_id).await {
        Ok(assignments) => assignments,
        Err(e) => return Ok(ApiResponse::from_error(&e)),
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
        "Student assignments retrieved successfully",
    )))
}

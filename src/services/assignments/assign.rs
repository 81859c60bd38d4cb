use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, find_owned_assignment, partition_owned_students};
use crate::middlewares::RequireJWT;
use crate::models::assignments::requests::AssignStudentsRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized;

pub async fn assign_students(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    assign_data: AssignStudentsRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    let Some(student_ids) = assign_data.student_ids else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "student_ids array is required",
        )));
    };

    if let Err(response) = find_owned_assignment(&storage, user_id, assignment_id).await {
        return Ok(response);
    }

    let (owned, foreign) = match partition_owned_students(&storage, user_id, &student_ids).await {
        Ok(parts) => parts,
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    };

    match storage.assign_students(assignment_id, &owned).await {
        Ok(mut result) => {
            // 不属于该导师的学生同样视为跳过
            result.skipped.extend(foreign);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                result,
                "Students assigned to assignment successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to assign students to assignment: {e}"),
            )),
        ),
    }
}

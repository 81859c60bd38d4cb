use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::WorksheetService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::students::find_owned_student;
use crate::services::unauthorized;

pub async fn list_worksheets(
    service: &WorksheetService,
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

    match storage.list_worksheets_for_student(student_id).await {
        Ok(worksheets) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            worksheets,
            "Worksheets retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list worksheets: {e}"),
            )),
        ),
    }
}

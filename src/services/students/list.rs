use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::middlewares::RequireJWT;
use crate::models::students::responses::StudentResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized;

pub async fn list_students(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(teacher_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    match storage.list_students(teacher_id).await {
        Ok(students) => {
            let students: Vec<StudentResponse> =
                students.into_iter().map(StudentResponse::from).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                students,
                "Students retrieved successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to fetch students: {e}"),
            )),
        ),
    }
}

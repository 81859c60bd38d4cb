use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::middlewares::RequireJWT;
use crate::models::students::requests::StudentRequest;
use crate::models::students::responses::StudentResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized;

pub async fn create_student(
    service: &StudentService,
    request: &HttpRequest,
    student_data: StudentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(teacher_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    let input = match student_data.validate() {
        Ok(input) => input,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ValidationFailed,
                e.message(),
            )));
        }
    };

    match storage.create_student(teacher_id, input).await {
        Ok(student) => {
            tracing::info!("Tutor {} added student {}", teacher_id, student.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                StudentResponse::just_added(student),
                "Student created successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create student: {e}"),
            )),
        ),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, student_not_found};
use crate::middlewares::RequireJWT;
use crate::models::students::requests::StudentRequest;
use crate::models::students::responses::StudentResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::unauthorized;

pub async fn update_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
    student_data: StudentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(teacher_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    // 与创建相同的校验，weakTopics 缺省为空列表
    let input = match student_data.validate() {
        Ok(input) => input,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ValidationFailed,
                e.message(),
            )));
        }
    };

    match storage.update_student(teacher_id, student_id, input).await {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentResponse::from(student),
            "Student updated successfully",
        ))),
        Ok(None) => Ok(student_not_found()),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update student: {e}"),
            )),
        ),
    }
}

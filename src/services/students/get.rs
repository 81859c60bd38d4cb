use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, find_owned_student};
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::models::students::responses::StudentResponse;
use crate::services::unauthorized;

pub async fn get_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(teacher_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    match find_owned_student(&storage, teacher_id, student_id).await {
        Ok(student) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentResponse::from(student),
            "Student retrieved successfully",
        ))),
        Err(response) => Ok(response),
    }
}

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, assignment_not_found, find_owned_assignment};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::answer_keys::store_answer_key;
use crate::services::files::read_upload_form;
use crate::services::{get_object_store, unauthorized};

pub async fn upload_answer_key(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    if let Err(response) = find_owned_assignment(&storage, user_id, assignment_id).await {
        return Ok(response);
    }

    let mut form = match read_upload_form(payload, &["answerKey"]).await {
        Ok(form) => form,
        Err(response) => return Ok(response),
    };

    let Some(file) = form.take_file("answerKey") else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            "No file uploaded",
        )));
    };

    let object_store = get_object_store(request);
    let answer_key = match store_answer_key(
        &storage,
        object_store.as_ref(),
        user_id,
        &file,
        form.field("subject").map(str::to_string),
        form.field("grade").map(str::to_string),
    )
    .await
    {
        Ok(key) => key,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::FileUploadFailed,
                    format!("Failed to upload answer key: {e}"),
                )),
            );
        }
    };

    // 将作业指向新答案
    match storage
        .set_assignment_answer_key(assignment_id, answer_key.id, &answer_key.file_url)
        .await
    {
        Ok(Some(_)) => Ok(HttpResponse::Created().json(ApiResponse::success(
            answer_key,
            "Answer key uploaded and assignment updated",
        ))),
        Ok(None) => Ok(assignment_not_found()),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update assignment with answer key: {e}"),
            )),
        ),
    }
}

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AnswerKeyService, store_answer_key};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::files::read_upload_form;
use crate::services::{get_object_store, unauthorized};

pub async fn upload_answer_key(
    service: &AnswerKeyService,
    request: &HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let Some(uploader_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    let mut form = match read_upload_form(payload, &["file"]).await {
        Ok(form) => form,
        Err(response) => return Ok(response),
    };

    let Some(file) = form.take_file("file") else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            "No file uploaded",
        )));
    };

    let storage = service.get_storage(request);
    let object_store = get_object_store(request);

    match store_answer_key(
        &storage,
        object_store.as_ref(),
        uploader_id,
        &file,
        form.field("subject").map(str::to_string),
        form.field("grade").map(str::to_string),
    )
    .await
    {
        Ok(answer_key) => {
            tracing::info!("Answer key {} uploaded by {}", answer_key.id, uploader_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(answer_key, "Answer key uploaded")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::FileUploadFailed,
                format!("Failed to upload answer key: {e}"),
            )),
        ),
    }
}

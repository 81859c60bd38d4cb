use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, find_owned_assignment};
use crate::blob::{WORKSHEETS_BUCKET, discard_object, worksheet_path};
use crate::middlewares::RequireJWT;
use crate::models::worksheets::entities::{NewWorksheet, WorksheetAnalysis, WorksheetStatus};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::ai::llm_client;
use crate::services::files::read_upload_form;
use crate::services::grading::grade_with_answer_key;
use crate::services::students::find_owned_student;
use crate::services::{get_object_store, unauthorized};

pub async fn upload_worksheet(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    student_id: i64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    let assignment = match find_owned_assignment(&storage, user_id, assignment_id).await {
        Ok(assignment) => assignment,
        Err(response) => return Ok(response),
    };
    if let Err(response) = find_owned_student(&storage, user_id, student_id).await {
        return Ok(response);
    }

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

    // 1. 写入对象存储
    let object_store = get_object_store(request);
    let path = worksheet_path(student_id, &file.file_name);
    let stored = match file
        .store(object_store.as_ref(), WORKSHEETS_BUCKET, &path)
        .await
    {
        Ok(stored) => stored,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::FileUploadFailed,
                    format!("Failed to upload worksheet file: {e}"),
                )),
            );
        }
    };

    // 2. 作业有答案时批改，没有答案只保存文件
    let answer_key = match assignment.answer_key_id {
        Some(key_id) => match storage.get_answer_key(key_id).await {
            Ok(key) => key,
            Err(e) => {
                discard_object(object_store.as_ref(), &stored.bucket, &stored.path).await;
                return Ok(ApiResponse::from_error(&e));
            }
        },
        None => None,
    };

    let (status, analysis) = match &answer_key {
        Some(key) => {
            let llm = llm_client(request);
            match grade_with_answer_key(
                llm.as_deref(),
                object_store.as_ref(),
                key,
                &file.file_name,
                &file.data,
            )
            .await
            {
                Ok(result) => (
                    WorksheetStatus::Completed,
                    Some(WorksheetAnalysis::from(&result)),
                ),
                Err(e) => {
                    tracing::warn!(
                        "Worksheet analysis failed for assignment {}: {}",
                        assignment_id,
                        e
                    );
                    (WorksheetStatus::Failed, None)
                }
            }
        }
        None => (WorksheetStatus::Uploaded, None),
    };

    // 3. 保存作答记录
    let new_worksheet = NewWorksheet {
        student_id,
        assignment_id: Some(assignment_id),
        answer_key_id: answer_key.as_ref().map(|k| k.id),
        answer_key_url: answer_key.map(|k| k.file_url),
        file_name: file.file_name,
        file_url: stored.public_url,
        storage_bucket: stored.bucket.clone(),
        storage_path: stored.path.clone(),
        status,
        analysis,
    };

    match storage.create_worksheet(new_worksheet).await {
        Ok(worksheet) => {
            if let Err(e) = storage.touch_student_activity(student_id).await {
                tracing::warn!("Failed to touch student {} activity: {}", student_id, e);
            }
            Ok(HttpResponse::Created().json(ApiResponse::success(
                worksheet,
                "Worksheet uploaded and analyzed",
            )))
        }
        Err(e) => {
            discard_object(object_store.as_ref(), &stored.bucket, &stored.path).await;
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to save worksheet: {e}"),
                )),
            )
        }
    }
}

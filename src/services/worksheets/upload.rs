use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{WorksheetService, find_owned_answer_key};
use crate::blob::{WORKSHEETS_BUCKET, discard_object, worksheet_path};
use crate::middlewares::RequireJWT;
use crate::models::worksheets::entities::{NewWorksheet, WorksheetAnalysis, WorksheetStatus};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::ai::llm_client;
use crate::services::files::read_upload_form;
use crate::services::grading::{grade, grade_with_answer_key};
use crate::services::students::find_owned_student;
use crate::services::{get_object_store, unauthorized};

// 未提供答案时交给 AI 的占位文本
const NO_ANSWER_KEY: &str = "(not provided)";

pub async fn upload_worksheet(
    service: &WorksheetService,
    request: &HttpRequest,
    student_id: i64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
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

    let answer_key = match form.field("answerKeyId") {
        Some(raw) => {
            let Ok(key_id) = raw.parse::<i64>() else {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::ValidationFailed,
                    "answerKeyId must be a number",
                )));
            };
            match find_owned_answer_key(&storage, user_id, key_id).await {
                Ok(key) => Some(key),
                Err(response) => return Ok(response),
            }
        }
        None => None,
    };

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

    // 先以 analyzing 状态落库，分析结束后再更新
    let worksheet = match storage
        .create_worksheet(NewWorksheet {
            student_id,
            assignment_id: None,
            answer_key_id: answer_key.as_ref().map(|k| k.id),
            answer_key_url: answer_key.as_ref().map(|k| k.file_url.clone()),
            file_name: file.file_name.clone(),
            file_url: stored.public_url,
            storage_bucket: stored.bucket.clone(),
            storage_path: stored.path.clone(),
            status: WorksheetStatus::Analyzing,
            analysis: None,
        })
        .await
    {
        Ok(worksheet) => worksheet,
        Err(e) => {
            discard_object(object_store.as_ref(), &stored.bucket, &stored.path).await;
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to save worksheet: {e}"),
                )),
            );
        }
    };

    let llm = llm_client(request);
    let result = match &answer_key {
        Some(key) => {
            grade_with_answer_key(
                llm.as_deref(),
                object_store.as_ref(),
                key,
                &file.file_name,
                &file.data,
            )
            .await
        }
        None => grade(llm.as_deref(), &file.file_name, &file.data, NO_ANSWER_KEY).await,
    };

    let (status, analysis) = match result {
        Ok(result) => (
            WorksheetStatus::Completed,
            Some(WorksheetAnalysis::from(&result)),
        ),
        Err(e) => {
            tracing::warn!("Analysis of worksheet {} failed: {}", worksheet.id, e);
            (WorksheetStatus::Failed, None)
        }
    };

    let worksheet = match storage
        .update_worksheet_analysis(worksheet.id, status, analysis)
        .await
    {
        Ok(Some(updated)) => updated,
        Ok(None) => worksheet,
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    };

    if let Err(e) = storage.touch_student_activity(student_id).await {
        tracing::warn!("Failed to touch student {} activity: {}", student_id, e);
    }

    Ok(HttpResponse::Created().json(ApiResponse::success(
        worksheet,
        "Worksheet uploaded successfully",
    )))
}

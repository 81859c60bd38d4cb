use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::WorksheetService;
use crate::blob::{WORKSHEETS_BUCKET, discard_object, worksheet_path};
use crate::middlewares::RequireJWT;
use crate::models::worksheets::entities::{NewWorksheet, WorksheetAnalysis, WorksheetStatus};
use crate::models::worksheets::requests::WorksheetWithAnswerKeyQuery;
use crate::models::worksheets::responses::WorksheetAnalysisResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::ai::llm_client;
use crate::services::answer_keys::store_answer_key;
use crate::services::assignments::find_owned_assignment;
use crate::services::extract::extract_text_blocking;
use crate::services::files::read_upload_form;
use crate::services::grading::grade;
use crate::services::students::find_owned_student;
use crate::services::{get_object_store, unauthorized};

pub async fn upload_with_answer_key(
    service: &WorksheetService,
    request: &HttpRequest,
    student_id: i64,
    query: WorksheetWithAnswerKeyQuery,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    if let Err(response) = find_owned_student(&storage, user_id, student_id).await {
        return Ok(response);
    }
    if let Some(assignment_id) = query.assignment_id
        && let Err(response) = find_owned_assignment(&storage, user_id, assignment_id).await
    {
        return Ok(response);
    }

    let mut form = match read_upload_form(payload, &["worksheet", "answerKey"]).await {
        Ok(form) => form,
        Err(response) => return Ok(response),
    };
    let (Some(worksheet_file), Some(key_file)) =
        (form.take_file("worksheet"), form.take_file("answerKey"))
    else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Both worksheet and answer key files are required",
        )));
    };

    // 1. 直接从上传内容中读取答案并批改
    let key_text = match extract_text_blocking(key_file.file_name.clone(), key_file.data.clone())
        .await
    {
        Ok(text) => text,
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    };
    let llm = llm_client(request);
    let ai_result = match grade(
        llm.as_deref(),
        &worksheet_file.file_name,
        &worksheet_file.data,
        &key_text,
    )
    .await
    {
        Ok(result) => result,
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    };

    // 2. 保存两个文件与作答记录
    let object_store = get_object_store(request);
    let answer_key = match store_answer_key(
        &storage,
        object_store.as_ref(),
        user_id,
        &key_file,
        None,
        None,
    )
    .await
    {
        Ok(key) => key,
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    };

    let path = worksheet_path(student_id, &worksheet_file.file_name);
    let stored = match worksheet_file
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

    let new_worksheet = NewWorksheet {
        student_id,
        assignment_id: query.assignment_id,
        answer_key_id: Some(answer_key.id),
        answer_key_url: Some(answer_key.file_url),
        file_name: worksheet_file.file_name,
        file_url: stored.public_url,
        storage_bucket: stored.bucket.clone(),
        storage_path: stored.path.clone(),
        status: WorksheetStatus::Completed,
        analysis: Some(WorksheetAnalysis::from(&ai_result)),
    };

    let worksheet = match storage.create_worksheet(new_worksheet).await {
        Ok(worksheet) => worksheet,
        Err(e) => {
            discard_object(object_store.as_ref(), &stored.bucket, &stored.path).await;
            return Ok(ApiResponse::from_error(&e));
        }
    };

    if let Err(e) = storage.touch_student_activity(student_id).await {
        tracing::warn!("Failed to touch student {} activity: {}", student_id, e);
    }

    Ok(HttpResponse::Created().json(ApiResponse::success(
        WorksheetAnalysisResponse {
            message: "Worksheet and answer key analyzed successfully".to_string(),
            ai_result,
            worksheet,
        },
        "Worksheet analyzed",
    )))
}

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{AssignmentService, build_detail, partition_owned_students};
use crate::errors::Result;
use crate::middlewares::RequireJWT;
use crate::models::assignments::entities::NewAssignment;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::answer_keys::store_answer_key;
use crate::services::files::read_upload_form;
use crate::services::{get_object_store, unauthorized};
use crate::storage::Storage;

/// `studentIds` 是 JSON 数组字符串，元素可以是数字或数字字符串
fn parse_student_ids(raw: &str) -> Option<Vec<i64>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw).ok()?;
    values
        .into_iter()
        .map(|v| match v {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .collect()
}

async fn link_students(
    storage: &Arc<dyn Storage>,
    user_id: i64,
    assignment_id: i64,
    student_ids: &[i64],
) -> Result<()> {
    let (owned, foreign) = partition_owned_students(storage, user_id, student_ids).await?;
    if !foreign.is_empty() {
        tracing::warn!("Ignoring students {:?} not owned by tutor {}", foreign, user_id);
    }
    storage.assign_students(assignment_id, &owned).await?;
    Ok(())
}

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    let mut form = match read_upload_form(payload, &["answerKey"]).await {
        Ok(form) => form,
        Err(response) => return Ok(response),
    };

    let Some(title) = form.field("title").map(str::to_string) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Title is required",
        )));
    };

    let student_ids = match form.field("studentIds") {
        Some(raw) => match parse_student_ids(raw) {
            Some(ids) => ids,
            None => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::ValidationFailed,
                    "studentIds must be a JSON array of student ids",
                )));
            }
        },
        None => Vec::new(),
    };

    let subject = form.field("subject").map(str::to_string);
    let grade = form.field("grade").map(str::to_string);
    let storage = service.get_storage(request);

    // 1. 可选的答案文件
    let answer_key = match form.take_file("answerKey") {
        Some(file) => {
            let object_store = get_object_store(request);
            match store_answer_key(
                &storage,
                object_store.as_ref(),
                user_id,
                &file,
                subject.clone(),
                grade.clone(),
            )
            .await
            {
                Ok(key) => Some(key),
                Err(e) => {
                    return Ok(
                        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                            ErrorCode::FileUploadFailed,
                            format!("Failed to upload answer key: {e}"),
                        )),
                    );
                }
            }
        }
        None => None,
    };

    // 2. 创建作业
    let new_assignment = NewAssignment {
        created_by: user_id,
        title,
        subject,
        grade,
        due_date: form.field("dueDate").map(str::to_string),
        answer_key_id: answer_key.as_ref().map(|k| k.id),
        answer_key_url: answer_key.map(|k| k.file_url),
    };

    let assignment = match storage.create_assignment(new_assignment).await {
        Ok(assignment) => assignment,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to create assignment: {e}"),
                )),
            );
        }
    };

    // 3. 分配学生，失败只记录日志
    if !student_ids.is_empty()
        && let Err(e) = link_students(&storage, user_id, assignment.id, &student_ids).await
    {
        tracing::error!(
            "Failed to assign students to assignment {}: {}",
            assignment.id,
            e
        );
    }

    tracing::info!("Assignment {} created by {}", assignment.id, user_id);

    match build_detail(&storage, assignment).await {
        Ok(detail) => Ok(HttpResponse::Created().json(ApiResponse::success(
            detail,
            "Assignment created successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

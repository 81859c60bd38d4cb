use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, find_owned_assignment};
use crate::middlewares::RequireJWT;
use crate::models::questions::GeneratedQuestionsResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::ai::{generate_questions as generate_for_topics, llm_client};
use crate::services::students::find_owned_student;
use crate::services::unauthorized;

pub async fn generate_questions(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    if let Err(response) = find_owned_assignment(&storage, user_id, assignment_id).await {
        return Ok(response);
    }
    if let Err(response) = find_owned_student(&storage, user_id, student_id).await {
        return Ok(response);
    }

    // 取该学生在该作业下最近一次作答的薄弱知识点
    let weak_topics = match storage.get_latest_worksheet(assignment_id, student_id).await {
        Ok(worksheet) => worksheet
            .and_then(|w| w.weak_topics)
            .filter(|topics| !topics.is_empty()),
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    };
    let Some(weak_topics) = weak_topics else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::NoWeakTopics,
            "No weak topics found",
        )));
    };

    let llm = llm_client(request);
    let questions = generate_for_topics(llm.as_deref(), &weak_topics).await;

    if let Err(e) = storage
        .save_generated_questions(assignment_id, student_id, &questions)
        .await
    {
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to store generated questions: {e}"),
            )),
        );
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        GeneratedQuestionsResponse { questions },
        "Practice questions generated",
    )))
}

pub async fn get_generated_questions(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    if let Err(response) = find_owned_assignment(&storage, user_id, assignment_id).await {
        return Ok(response);
    }

    match storage
        .get_generated_questions(assignment_id, student_id)
        .await
    {
        Ok(questions) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            GeneratedQuestionsResponse {
                questions: questions.unwrap_or_default(),
            },
            "Generated questions retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to fetch generated questions: {e}"),
            )),
        ),
    }
}

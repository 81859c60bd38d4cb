use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{WorksheetService, worksheet_not_found};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{get_object_store, unauthorized};

pub async fn delete_worksheet(
    service: &WorksheetService,
    request: &HttpRequest,
    worksheet_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    let worksheet = match storage.get_worksheet(worksheet_id).await {
        Ok(Some(worksheet)) => worksheet,
        Ok(None) => return Ok(worksheet_not_found()),
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    };

    // 作答归属于学生，学生归属于导师
    match storage.get_student(user_id, worksheet.student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(worksheet_not_found()),
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    }

    let object_store = get_object_store(request);
    if let Err(e) = object_store
        .remove(&worksheet.storage_bucket, &worksheet.storage_path)
        .await
    {
        tracing::warn!(
            "Failed to remove worksheet file {}/{}: {}",
            worksheet.storage_bucket,
            worksheet.storage_path,
            e
        );
    }

    match storage.delete_worksheet(worksheet_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Worksheet deleted successfully",
        ))),
        Ok(false) => Ok(worksheet_not_found()),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to delete worksheet: {e}"),
            )),
        ),
    }
}

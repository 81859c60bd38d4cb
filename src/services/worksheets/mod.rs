pub mod delete;
pub mod list;
pub mod upload;
pub mod with_answer_key;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::answer_keys::entities::AnswerKey;
use crate::models::worksheets::requests::WorksheetWithAnswerKeyQuery;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct WorksheetService {
    storage: Option<Arc<dyn Storage>>,
}

impl WorksheetService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 上传作答并立即分析
    pub async fn upload_worksheet(
        &self,
        request: &HttpRequest,
        student_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::upload_worksheet(self, request, student_id, payload).await
    }

    pub async fn list_worksheets(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_worksheets(self, request, student_id).await
    }

    // 同时上传作答与答案
    pub async fn upload_with_answer_key(
        &self,
        request: &HttpRequest,
        student_id: i64,
        query: WorksheetWithAnswerKeyQuery,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        with_answer_key::upload_with_answer_key(self, request, student_id, query, payload).await
    }

    pub async fn delete_worksheet(
        &self,
        request: &HttpRequest,
        worksheet_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_worksheet(self, request, worksheet_id).await
    }
}

pub(crate) fn worksheet_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::WorksheetNotFound,
        "Worksheet not found",
    ))
}

fn answer_key_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::AnswerKeyNotFound,
        "Answer key not found",
    ))
}

/// 读取当前导师上传的答案
pub(crate) async fn find_owned_answer_key(
    storage: &Arc<dyn Storage>,
    uploader_id: i64,
    key_id: i64,
) -> Result<AnswerKey, HttpResponse> {
    match storage.get_answer_key(key_id).await {
        Ok(Some(key)) if key.uploader_id == uploader_id => Ok(key),
        Ok(_) => Err(answer_key_not_found()),
        Err(e) => Err(ApiResponse::from_error(&e)),
    }
}

pub mod list;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::blob::{ASSIGNMENTS_BUCKET, ObjectStore, answer_key_path, discard_object};
use crate::errors::Result;
use crate::models::answer_keys::entities::{AnswerKey, NewAnswerKey};
use crate::models::answer_keys::requests::AnswerKeyQuery;
use crate::services::files::UploadedFile;
use crate::storage::Storage;

pub struct AnswerKeyService {
    storage: Option<Arc<dyn Storage>>,
}

impl AnswerKeyService {
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

    // 上传答案
    pub async fn upload_answer_key(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::upload_answer_key(self, request, payload).await
    }

    // 按学科、年级筛选答案
    pub async fn list_answer_keys(
        &self,
        request: &HttpRequest,
        query: AnswerKeyQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_answer_keys(self, request, query).await
    }
}

/// 写入答案文件并登记记录
pub(crate) async fn store_answer_key(
    storage: &Arc<dyn Storage>,
    object_store: &dyn ObjectStore,
    uploader_id: i64,
    file: &UploadedFile,
    subject: Option<String>,
    grade: Option<String>,
) -> Result<AnswerKey> {
    let path = answer_key_path(&file.file_name);
    let stored = file.store(object_store, ASSIGNMENTS_BUCKET, &path).await?;

    let created = storage
        .create_answer_key(NewAnswerKey {
            uploader_id,
            file_name: file.file_name.clone(),
            file_url: stored.public_url,
            storage_bucket: stored.bucket.clone(),
            storage_path: stored.path.clone(),
            subject,
            grade,
        })
        .await;
    if created.is_err() {
        discard_object(object_store, &stored.bucket, &stored.path).await;
    }
    created
}

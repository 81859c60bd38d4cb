pub mod download;
pub mod upload;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::blob::ObjectStore;

pub use upload::{UploadForm, UploadedFile, read_upload_form};

pub struct FileService {
    object_store: Option<Arc<dyn ObjectStore>>,
}

impl FileService {
    pub fn new_lazy() -> Self {
        Self { object_store: None }
    }

    pub(crate) fn get_object_store(&self, request: &HttpRequest) -> Arc<dyn ObjectStore> {
        if let Some(object_store) = &self.object_store {
            object_store.clone()
        } else {
            super::get_object_store(request)
        }
    }

    // 读取已存储的对象
    pub async fn handle_download(
        &self,
        request: &HttpRequest,
        bucket: String,
        path: String,
    ) -> ActixResult<HttpResponse> {
        download::handle_download(self, request, bucket, path).await
    }
}

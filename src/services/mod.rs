pub mod ai;
pub mod answer_keys;
pub mod assignments;
pub mod auth;
pub mod extract;
pub mod files;
pub mod grading;
pub mod health;
pub mod students;
pub mod worksheets;

pub use answer_keys::AnswerKeyService;
pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use files::FileService;
pub use health::HealthService;
pub use students::StudentService;
pub use worksheets::WorksheetService;

use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::blob::ObjectStore;
use crate::models::{ApiResponse, ErrorCode};

pub(crate) fn get_object_store(request: &HttpRequest) -> Arc<dyn ObjectStore> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn ObjectStore>>>()
        .expect("ObjectStore not found in app data")
        .get_ref()
        .clone()
}

/// 请求扩展中没有当前用户时的响应
pub(crate) fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Unauthorized access, please login",
    ))
}

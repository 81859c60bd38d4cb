pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::students::entities::Student;
use crate::models::students::requests::StudentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
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

    // 获取学生列表
    pub async fn list_students(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_students(self, request).await
    }

    pub async fn create_student(
        &self,
        request: &HttpRequest,
        student_data: StudentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, request, student_data).await
    }

    // 根据 ID 获取学生
    pub async fn get_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_student(self, request, student_id).await
    }

    pub async fn update_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
        student_data: StudentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, request, student_id, student_data).await
    }

    pub async fn delete_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_student(self, request, student_id).await
    }
}

pub(crate) fn student_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::StudentNotFound,
        "Student not found",
    ))
}

/// 读取当前导师名下的学生，不存在或不属于该导师时返回 404
pub(crate) async fn find_owned_student(
    storage: &Arc<dyn Storage>,
    teacher_id: i64,
    student_id: i64,
) -> Result<Student, HttpResponse> {
    match storage.get_student(teacher_id, student_id).await {
        Ok(Some(student)) => Ok(student),
        Ok(None) => Err(student_not_found()),
        Err(e) => Err(ApiResponse::from_error(&e)),
    }
}

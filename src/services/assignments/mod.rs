pub mod answer_key;
pub mod assign;
pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod questions;
pub mod student;
pub mod update;
pub mod worksheet;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::assignments::entities::Assignment;
use crate::models::assignments::requests::{AssignStudentsRequest, UpdateAssignmentRequest};
use crate::models::assignments::responses::AssignmentDetail;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
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

    // 获取作业列表
    pub async fn list_assignments(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_assignments(self, request).await
    }

    pub async fn get_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_assignment(self, request, assignment_id).await
    }

    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, request, payload).await
    }

    pub async fn update_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        update_data: UpdateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assignment(self, request, assignment_id, update_data).await
    }

    pub async fn delete_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assignment(self, request, assignment_id).await
    }

    // 获取分配给某学生的作业
    pub async fn list_student_assignments(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        student::list_student_assignments(self, request, student_id).await
    }

    pub async fn assign_students(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        assign_data: AssignStudentsRequest,
    ) -> ActixResult<HttpResponse> {
        assign::assign_students(self, request, assignment_id, assign_data).await
    }

    // 上传或替换作业答案
    pub async fn upload_answer_key(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        answer_key::upload_answer_key(self, request, assignment_id, payload).await
    }

    // 上传学生作答并批改
    pub async fn upload_worksheet(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        student_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        worksheet::upload_worksheet(self, request, assignment_id, student_id, payload).await
    }

    // 根据薄弱知识点生成练习题
    pub async fn generate_questions(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        questions::generate_questions(self, request, assignment_id, student_id).await
    }

    pub async fn get_generated_questions(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        questions::get_generated_questions(self, request, assignment_id, student_id).await
    }
}

pub(crate) fn assignment_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::AssignmentNotFound,
        "Assignment not found",
    ))
}

/// 读取当前导师创建的作业
pub(crate) async fn find_owned_assignment(
    storage: &Arc<dyn Storage>,
    created_by: i64,
    assignment_id: i64,
) -> std::result::Result<Assignment, HttpResponse> {
    match storage.get_assignment(created_by, assignment_id).await {
        Ok(Some(assignment)) => Ok(assignment),
        Ok(None) => Err(assignment_not_found()),
        Err(e) => Err(ApiResponse::from_error(&e)),
    }
}

/// 附带答案与已分配学生
pub(crate) async fn build_detail(
    storage: &Arc<dyn Storage>,
    assignment: Assignment,
) -> Result<AssignmentDetail> {
    let answer_key = match assignment.answer_key_id {
        Some(key_id) => storage.get_answer_key(key_id).await?,
        None => None,
    };
    let students = storage.list_assigned_students(assignment.id).await?;

    Ok(AssignmentDetail {
        assignment,
        answer_key,
        students,
    })
}

/// 按是否属于该导师拆分学生 ID
pub(crate) async fn partition_owned_students(
    storage: &Arc<dyn Storage>,
    teacher_id: i64,
    student_ids: &[i64],
) -> Result<(Vec<i64>, Vec<i64>)> {
    let mut owned = Vec::new();
    let mut foreign = Vec::new();
    for &student_id in student_ids {
        if storage.get_student(teacher_id, student_id).await?.is_some() {
            owned.push(student_id);
        } else {
            foreign.push(student_id);
        }
    }
    Ok((owned, foreign))
}

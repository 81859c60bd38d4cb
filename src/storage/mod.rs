use std::sync::Arc;

use crate::models::{
    answer_keys::{
        entities::{AnswerKey, NewAnswerKey},
        requests::AnswerKeyQuery,
    },
    assignments::{
        entities::{Assignment, NewAssignment},
        requests::UpdateAssignmentRequest,
        responses::{AssignStudentsResponse, AssignedStudent},
    },
    questions::PracticeQuestion,
    students::{entities::Student, requests::StudentInput},
    users::entities::User,
    worksheets::entities::{NewWorksheet, Worksheet, WorksheetAnalysis, WorksheetStatus},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        user_metadata: serde_json::Value,
    ) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 替换用户元数据
    async fn update_user_metadata(
        &self,
        id: i64,
        user_metadata: serde_json::Value,
    ) -> Result<Option<User>>;

    /// 学生管理方法（均按导师隔离）
    async fn list_students(&self, teacher_id: i64) -> Result<Vec<Student>>;
    async fn get_student(&self, teacher_id: i64, student_id: i64) -> Result<Option<Student>>;
    async fn create_student(&self, teacher_id: i64, input: StudentInput) -> Result<Student>;
    async fn update_student(
        &self,
        teacher_id: i64,
        student_id: i64,
        input: StudentInput,
    ) -> Result<Option<Student>>;
    async fn delete_student(&self, teacher_id: i64, student_id: i64) -> Result<bool>;
    // 刷新学生最近活动时间
    async fn touch_student_activity(&self, student_id: i64) -> Result<()>;

    /// 答案管理方法
    async fn create_answer_key(&self, key: NewAnswerKey) -> Result<AnswerKey>;
    async fn get_answer_key(&self, id: i64) -> Result<Option<AnswerKey>>;
    async fn list_answer_keys(
        &self,
        uploader_id: i64,
        query: AnswerKeyQuery,
    ) -> Result<Vec<AnswerKey>>;

    /// 作业管理方法
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment>;
    async fn get_assignment(&self, created_by: i64, id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments(&self, created_by: i64) -> Result<Vec<Assignment>>;
    async fn update_assignment(
        &self,
        created_by: i64,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    // 将作业指向新的答案
    async fn set_assignment_answer_key(
        &self,
        id: i64,
        answer_key_id: i64,
        answer_key_url: &str,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, created_by: i64, id: i64) -> Result<bool>;
    // 列出分配给某学生的作业
    async fn list_assignments_for_student(&self, student_id: i64) -> Result<Vec<Assignment>>;
    // 分配学生，已存在的关联会被跳过
    async fn assign_students(
        &self,
        assignment_id: i64,
        student_ids: &[i64],
    ) -> Result<AssignStudentsResponse>;
    async fn list_assigned_students(&self, assignment_id: i64) -> Result<Vec<AssignedStudent>>;

    /// 学生作答管理方法
    async fn create_worksheet(&self, worksheet: NewWorksheet) -> Result<Worksheet>;
    async fn get_worksheet(&self, id: i64) -> Result<Option<Worksheet>>;
    async fn list_worksheets_for_student(&self, student_id: i64) -> Result<Vec<Worksheet>>;
    // 写入分析状态与结果
    async fn update_worksheet_analysis(
        &self,
        id: i64,
        status: WorksheetStatus,
        analysis: Option<WorksheetAnalysis>,
    ) -> Result<Option<Worksheet>>;
    async fn delete_worksheet(&self, id: i64) -> Result<bool>;
    // 获取某作业下某学生最近一次作答
    async fn get_latest_worksheet(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Worksheet>>;

    /// 练习题管理方法
    async fn save_generated_questions(
        &self,
        assignment_id: i64,
        student_id: i64,
        questions: &[PracticeQuestion],
    ) -> Result<()>;
    async fn get_generated_questions(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Vec<PracticeQuestion>>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}

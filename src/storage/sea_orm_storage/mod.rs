//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod answer_keys;
mod assignments;
mod questions;
mod students;
mod users;
mod worksheets;

use crate::config::AppConfig;
use crate::errors::{TutorHubError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(storage)
    }

    /// 使用已有连接创建存储实例并运行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| TutorHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| TutorHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| TutorHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(TutorHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        user_metadata: serde_json::Value,
    ) -> Result<User> {
        self.create_user_impl(email, password_hash, user_metadata)
            .await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn update_user_metadata(
        &self,
        id: i64,
        user_metadata: serde_json::Value,
    ) -> Result<Option<User>> {
        self.update_user_metadata_impl(id, user_metadata).await
    }

    // 学生模块
    async fn list_students(&self, teacher_id: i64) -> Result<Vec<Student>> {
        self.list_students_impl(teacher_id).await
    }

    async fn get_student(&self, teacher_id: i64, student_id: i64) -> Result<Option<Student>> {
        self.get_student_impl(teacher_id, student_id).await
    }

    async fn create_student(&self, teacher_id: i64, input: StudentInput) -> Result<Student> {
        self.create_student_impl(teacher_id, input).await
    }

    async fn update_student(
        &self,
        teacher_id: i64,
        student_id: i64,
        input: StudentInput,
    ) -> Result<Option<Student>> {
        self.update_student_impl(teacher_id, student_id, input)
            .await
    }

    async fn delete_student(&self, teacher_id: i64, student_id: i64) -> Result<bool> {
        self.delete_student_impl(teacher_id, student_id).await
    }

    async fn touch_student_activity(&self, student_id: i64) -> Result<()> {
        self.touch_student_activity_impl(student_id).await
    }

    // 答案模块
    async fn create_answer_key(&self, key: NewAnswerKey) -> Result<AnswerKey> {
        self.create_answer_key_impl(key).await
    }

    async fn get_answer_key(&self, id: i64) -> Result<Option<AnswerKey>> {
        self.get_answer_key_impl(id).await
    }

    async fn list_answer_keys(
        &self,
        uploader_id: i64,
        query: AnswerKeyQuery,
    ) -> Result<Vec<AnswerKey>> {
        self.list_answer_keys_impl(uploader_id, query).await
    }

    // 作业模块
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn get_assignment(&self, created_by: i64, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_impl(created_by, id).await
    }

    async fn list_assignments(&self, created_by: i64) -> Result<Vec<Assignment>> {
        self.list_assignments_impl(created_by).await
    }

    async fn update_assignment(
        &self,
        created_by: i64,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(created_by, id, update).await
    }

    async fn set_assignment_answer_key(
        &self,
        id: i64,
        answer_key_id: i64,
        answer_key_url: &str,
    ) -> Result<Option<Assignment>> {
        self.set_assignment_answer_key_impl(id, answer_key_id, answer_key_url)
            .await
    }

    async fn delete_assignment(&self, created_by: i64, id: i64) -> Result<bool> {
        self.delete_assignment_impl(created_by, id).await
    }

    async fn list_assignments_for_student(&self, student_id: i64) -> Result<Vec<Assignment>> {
        self.list_assignments_for_student_impl(student_id).await
    }

    async fn assign_students(
        &self,
        assignment_id: i64,
        student_ids: &[i64],
    ) -> Result<AssignStudentsResponse> {
        self.assign_students_impl(assignment_id, student_ids).await
    }

    async fn list_assigned_students(&self, assignment_id: i64) -> Result<Vec<AssignedStudent>> {
        self.list_assigned_students_impl(assignment_id).await
    }

    // 作答模块
    async fn create_worksheet(&self, worksheet: NewWorksheet) -> Result<Worksheet> {
        self.create_worksheet_impl(worksheet).await
    }

    async fn get_worksheet(&self, id: i64) -> Result<Option<Worksheet>> {
        self.get_worksheet_impl(id).await
    }

    async fn list_worksheets_for_student(&self, student_id: i64) -> Result<Vec<Worksheet>> {
        self.list_worksheets_for_student_impl(student_id).await
    }

    async fn update_worksheet_analysis(
        &self,
        id: i64,
        status: WorksheetStatus,
        analysis: Option<WorksheetAnalysis>,
    ) -> Result<Option<Worksheet>> {
        self.update_worksheet_analysis_impl(id, status, analysis)
            .await
    }

    async fn delete_worksheet(&self, id: i64) -> Result<bool> {
        self.delete_worksheet_impl(id).await
    }

    async fn get_latest_worksheet(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Worksheet>> {
        self.get_latest_worksheet_impl(assignment_id, student_id)
            .await
    }

    // 练习题模块
    async fn save_generated_questions(
        &self,
        assignment_id: i64,
        student_id: i64,
        questions: &[PracticeQuestion],
    ) -> Result<()> {
        self.save_generated_questions_impl(assignment_id, student_id, questions)
            .await
    }

    async fn get_generated_questions(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Vec<PracticeQuestion>>> {
        self.get_generated_questions_impl(assignment_id, student_id)
            .await
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("tutorhub.db").unwrap(),
            "sqlite://tutorhub.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/db").unwrap(),
            "postgres://u:p@localhost/db"
        );
        assert!(SeaOrmStorage::build_database_url("ftp://nope").is_err());
    }
}

use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, TutorHubError};
use crate::models::users::entities::{User, UserStatus};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, SqlErr};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(
        &self,
        email: &str,
        password_hash: &str,
        user_metadata: serde_json::Value,
    ) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            status: Set(UserStatus::Active.to_string()),
            user_metadata: Set(user_metadata.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            // 并发注册时由唯一索引兜底
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                TutorHubError::conflict(format!("Email {email} already exists"))
            } else {
                TutorHubError::database_operation(format!("创建用户失败: {e}"))
            }
        })?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 替换用户元数据
    pub async fn update_user_metadata_impl(
        &self,
        id: i64,
        user_metadata: serde_json::Value,
    ) -> Result<Option<User>> {
        if self.get_user_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            user_metadata: Set(user_metadata.to_string()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("更新用户资料失败: {e}")))?;

        Ok(Some(result.into_user()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;

    #[tokio::test]
    async fn test_create_and_find_user() {
        let storage = memory_storage().await;
        let user = storage
            .create_user_impl(
                "tutor@example.com",
                "hash",
                serde_json::json!({"full_name": "Ada"}),
            )
            .await
            .unwrap();

        assert!(user.is_active());
        let found = storage
            .get_user_by_email_impl("tutor@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.user_metadata["full_name"], "Ada");
        assert!(found.last_login.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let storage = memory_storage().await;
        storage
            .create_user_impl("dup@example.com", "hash", serde_json::json!({}))
            .await
            .unwrap();
        let err = storage
            .create_user_impl("dup@example.com", "hash", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::errors::TutorHubError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_metadata_and_last_login() {
        let storage = memory_storage().await;
        let user = storage
            .create_user_impl("meta@example.com", "hash", serde_json::json!({}))
            .await
            .unwrap();

        assert!(storage.update_last_login_impl(user.id).await.unwrap());
        let updated = storage
            .update_user_metadata_impl(user.id, serde_json::json!({"school": "North"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.user_metadata["school"], "North");
        assert!(updated.last_login.is_some());

        assert!(
            storage
                .update_user_metadata_impl(9999, serde_json::json!({}))
                .await
                .unwrap()
                .is_none()
        );
    }
}

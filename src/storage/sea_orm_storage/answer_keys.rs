use super::SeaOrmStorage;
use crate::entity::answer_keys::{ActiveModel, Column, Entity as AnswerKeys};
use crate::errors::{Result, TutorHubError};
use crate::models::answer_keys::{
    entities::{AnswerKey, NewAnswerKey},
    requests::AnswerKeyQuery,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 记录上传的答案文件
    pub async fn create_answer_key_impl(&self, key: NewAnswerKey) -> Result<AnswerKey> {
        let model = ActiveModel {
            uploader_id: Set(key.uploader_id),
            file_name: Set(key.file_name),
            file_url: Set(key.file_url),
            storage_bucket: Set(key.storage_bucket),
            storage_path: Set(key.storage_path),
            subject: Set(key.subject),
            grade: Set(key.grade),
            upload_date: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("保存答案失败: {e}")))?;

        Ok(result.into_answer_key())
    }

    pub async fn get_answer_key_impl(&self, id: i64) -> Result<Option<AnswerKey>> {
        let result = AnswerKeys::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询答案失败: {e}")))?;

        Ok(result.map(|m| m.into_answer_key()))
    }

    /// 按学科/年级筛选上传者的答案
    pub async fn list_answer_keys_impl(
        &self,
        uploader_id: i64,
        query: AnswerKeyQuery,
    ) -> Result<Vec<AnswerKey>> {
        let mut select = AnswerKeys::find().filter(Column::UploaderId.eq(uploader_id));

        if let Some(subject) = query.subject.filter(|s| !s.trim().is_empty()) {
            select = select.filter(Column::Subject.eq(subject));
        }

        if let Some(grade) = query.grade.filter(|g| !g.trim().is_empty()) {
            select = select.filter(Column::Grade.eq(grade));
        }

        let keys = select
            .order_by_desc(Column::UploadDate)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询答案列表失败: {e}")))?;

        Ok(keys.into_iter().map(|m| m.into_answer_key()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::models::answer_keys::{entities::NewAnswerKey, requests::AnswerKeyQuery};

    fn new_key(uploader_id: i64, subject: &str, grade: &str) -> NewAnswerKey {
        NewAnswerKey {
            uploader_id,
            file_name: "key.pdf".to_string(),
            file_url: "http://localhost/api/files/assignments/answer-keys/1_key.pdf".to_string(),
            storage_bucket: "assignments".to_string(),
            storage_path: "answer-keys/1_key.pdf".to_string(),
            subject: Some(subject.to_string()),
            grade: Some(grade.to_string()),
        }
    }

    #[tokio::test]
    async fn test_list_answer_keys_filters() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "t@example.com").await;
        let other = seed_user(&storage, "o@example.com").await;

        storage.create_answer_key_impl(new_key(teacher, "Math", "5")).await.unwrap();
        storage.create_answer_key_impl(new_key(teacher, "Math", "6")).await.unwrap();
        storage.create_answer_key_impl(new_key(teacher, "Science", "5")).await.unwrap();
        storage.create_answer_key_impl(new_key(other, "Math", "5")).await.unwrap();

        let all = storage
            .list_answer_keys_impl(teacher, AnswerKeyQuery::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let math_5 = storage
            .list_answer_keys_impl(
                teacher,
                AnswerKeyQuery {
                    subject: Some("Math".to_string()),
                    grade: Some("5".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(math_5.len(), 1);
        assert_eq!(math_5[0].storage_bucket, "assignments");
    }
}

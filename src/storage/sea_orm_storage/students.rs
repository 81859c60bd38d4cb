use super::SeaOrmStorage;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::entity::encode_string_list;
use crate::errors::{Result, TutorHubError};
use crate::models::students::{entities::Student, requests::StudentInput};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 列出导师名下的学生，最新的在前
    pub async fn list_students_impl(&self, teacher_id: i64) -> Result<Vec<Student>> {
        let students = Students::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    /// 获取导师名下的某个学生
    pub async fn get_student_impl(
        &self,
        teacher_id: i64,
        student_id: i64,
    ) -> Result<Option<Student>> {
        let result = Students::find_by_id(student_id)
            .filter(Column::TeacherId.eq(teacher_id))
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 创建学生
    pub async fn create_student_impl(
        &self,
        teacher_id: i64,
        input: StudentInput,
    ) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            teacher_id: Set(teacher_id),
            name: Set(input.name),
            grade: Set(input.grade),
            subjects: Set(encode_string_list(&input.subjects)),
            weak_topics: Set(encode_string_list(&input.weak_topics)),
            avatar: Set(input.avatar),
            last_activity: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("创建学生失败: {e}")))?;

        Ok(result.into_student())
    }

    /// 更新学生
    pub async fn update_student_impl(
        &self,
        teacher_id: i64,
        student_id: i64,
        input: StudentInput,
    ) -> Result<Option<Student>> {
        if self.get_student_impl(teacher_id, student_id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(student_id),
            name: Set(input.name),
            grade: Set(input.grade),
            subjects: Set(encode_string_list(&input.subjects)),
            weak_topics: Set(encode_string_list(&input.weak_topics)),
            avatar: Set(input.avatar),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("更新学生失败: {e}")))?;

        Ok(Some(result.into_student()))
    }

    /// 删除学生
    pub async fn delete_student_impl(&self, teacher_id: i64, student_id: i64) -> Result<bool> {
        let result = Students::delete_many()
            .filter(Column::Id.eq(student_id))
            .filter(Column::TeacherId.eq(teacher_id))
            .exec(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("删除学生失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 刷新最近活动时间
    pub async fn touch_student_activity_impl(&self, student_id: i64) -> Result<()> {
        Students::update_many()
            .col_expr(
                Column::LastActivity,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(student_id))
            .exec(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("更新学生活动时间失败: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::models::students::requests::StudentInput;

    fn input(name: &str) -> StudentInput {
        StudentInput {
            name: name.to_string(),
            grade: "5".to_string(),
            subjects: vec!["Math".to_string()],
            weak_topics: vec![],
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_students_are_scoped_to_teacher() {
        let storage = memory_storage().await;
        let alice = seed_user(&storage, "alice@example.com").await;
        let bob = seed_user(&storage, "bob@example.com").await;

        let mia = storage.create_student_impl(alice, input("Mia")).await.unwrap();
        storage.create_student_impl(alice, input("Leo")).await.unwrap();
        storage.create_student_impl(bob, input("Zoe")).await.unwrap();

        let list = storage.list_students_impl(alice).await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "Leo");

        assert!(storage.get_student_impl(bob, mia.id).await.unwrap().is_none());
        assert!(storage.update_student_impl(bob, mia.id, input("X")).await.unwrap().is_none());
        assert!(!storage.delete_student_impl(bob, mia.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_and_delete_student() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "t@example.com").await;
        let student = storage.create_student_impl(teacher, input("Mia")).await.unwrap();

        let mut changed = input("Mia R.");
        changed.weak_topics = vec!["Fractions".to_string()];
        let updated = storage
            .update_student_impl(teacher, student.id, changed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Mia R.");
        assert_eq!(updated.weak_topics, vec!["Fractions"]);
        assert_eq!(updated.subjects, vec!["Math"]);

        assert!(storage.delete_student_impl(teacher, student.id).await.unwrap());
        assert!(storage.get_student_impl(teacher, student.id).await.unwrap().is_none());
    }
}

use super::SeaOrmStorage;
use crate::entity::assignment_students::{
    ActiveModel as LinkActiveModel, Column as LinkColumn, Entity as AssignmentStudents,
};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{Result, TutorHubError};
use crate::models::assignments::{
    entities::{Assignment, NewAssignment},
    requests::UpdateAssignmentRequest,
    responses::{AssignStudentsResponse, AssignedStudent},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(&self, assignment: NewAssignment) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            created_by: Set(assignment.created_by),
            title: Set(assignment.title),
            subject: Set(assignment.subject),
            grade: Set(assignment.grade),
            due_date: Set(assignment.due_date),
            answer_key_id: Set(assignment.answer_key_id),
            answer_key_url: Set(assignment.answer_key_url),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    pub async fn get_assignment_impl(&self, created_by: i64, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .filter(Column::CreatedBy.eq(created_by))
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    pub async fn list_assignments_impl(&self, created_by: i64) -> Result<Vec<Assignment>> {
        let assignments = Assignments::find()
            .filter(Column::CreatedBy.eq(created_by))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(assignments.into_iter().map(|m| m.into_assignment()).collect())
    }

    /// 部分更新作业，修改答案时同步答案链接
    pub async fn update_assignment_impl(
        &self,
        created_by: i64,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        if self.get_assignment_impl(created_by, id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(subject) = update.subject {
            model.subject = Set(Some(subject));
        }

        if let Some(grade) = update.grade {
            model.grade = Set(Some(grade));
        }

        if let Some(due_date) = update.due_date {
            model.due_date = Set(Some(due_date));
        }

        if let Some(answer_key_id) = update.answer_key_id {
            let key = self
                .get_answer_key_impl(answer_key_id)
                .await?
                .ok_or_else(|| TutorHubError::not_found("Answer key not found"))?;
            model.answer_key_id = Set(Some(key.id));
            model.answer_key_url = Set(Some(key.file_url));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("更新作业失败: {e}")))?;

        Ok(Some(result.into_assignment()))
    }

    pub async fn set_assignment_answer_key_impl(
        &self,
        id: i64,
        answer_key_id: i64,
        answer_key_url: &str,
    ) -> Result<Option<Assignment>> {
        let result = Assignments::update_many()
            .col_expr(
                Column::AnswerKeyId,
                sea_orm::sea_query::Expr::value(answer_key_id),
            )
            .col_expr(
                Column::AnswerKeyUrl,
                sea_orm::sea_query::Expr::value(answer_key_url),
            )
            .col_expr(
                Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("更新作业答案失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let assignment = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(assignment.map(|m| m.into_assignment()))
    }

    /// 删除作业及其学生关联
    pub async fn delete_assignment_impl(&self, created_by: i64, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TutorHubError::database_operation(format!("开启事务失败: {e}")))?;

        AssignmentStudents::delete_many()
            .filter(LinkColumn::AssignmentId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("删除作业关联失败: {e}")))?;

        let result = Assignments::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::CreatedBy.eq(created_by))
            .exec(&txn)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("删除作业失败: {e}")))?;

        if result.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| TutorHubError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(false);
        }

        txn.commit()
            .await
            .map_err(|e| TutorHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(true)
    }

    pub async fn list_assignments_for_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<Assignment>> {
        let assignment_ids: Vec<i64> = AssignmentStudents::find()
            .filter(LinkColumn::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询作业关联失败: {e}")))?
            .into_iter()
            .map(|link| link.assignment_id)
            .collect();

        if assignment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let assignments = Assignments::find()
            .filter(Column::Id.is_in(assignment_ids))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询学生作业失败: {e}")))?;

        Ok(assignments.into_iter().map(|m| m.into_assignment()).collect())
    }

    /// 建立作业与学生的关联，已存在的跳过
    pub async fn assign_students_impl(
        &self,
        assignment_id: i64,
        student_ids: &[i64],
    ) -> Result<AssignStudentsResponse> {
        let existing: Vec<i64> = AssignmentStudents::find()
            .filter(LinkColumn::AssignmentId.eq(assignment_id))
            .all(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询作业关联失败: {e}")))?
            .into_iter()
            .map(|link| link.student_id)
            .collect();

        let now = chrono::Utc::now().timestamp();
        let mut assigned = Vec::new();
        let mut skipped = Vec::new();

        for &student_id in student_ids {
            if existing.contains(&student_id) || assigned.contains(&student_id) {
                skipped.push(student_id);
                continue;
            }

            let link = LinkActiveModel {
                assignment_id: Set(assignment_id),
                student_id: Set(student_id),
                assigned_at: Set(now),
                ..Default::default()
            };

            link.insert(&self.db)
                .await
                .map_err(|e| TutorHubError::database_operation(format!("分配学生失败: {e}")))?;
            assigned.push(student_id);
        }

        Ok(AssignStudentsResponse { assigned, skipped })
    }

    pub async fn list_assigned_students_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<AssignedStudent>> {
        let student_ids: Vec<i64> = AssignmentStudents::find()
            .filter(LinkColumn::AssignmentId.eq(assignment_id))
            .order_by_asc(LinkColumn::AssignedAt)
            .all(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询作业关联失败: {e}")))?
            .into_iter()
            .map(|link| link.student_id)
            .collect();

        if student_ids.is_empty() {
            return Ok(Vec::new());
        }

        let students = Students::find()
            .filter(StudentColumn::Id.is_in(student_ids))
            .order_by_asc(StudentColumn::Name)
            .all(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(students
            .into_iter()
            .map(|s| AssignedStudent {
                id: s.id,
                name: s.name,
                grade: s.grade,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::models::assignments::{entities::NewAssignment, requests::UpdateAssignmentRequest};
    use crate::models::students::requests::StudentInput;

    fn new_assignment(created_by: i64, title: &str) -> NewAssignment {
        NewAssignment {
            created_by,
            title: title.to_string(),
            subject: Some("Math".to_string()),
            ..Default::default()
        }
    }

    fn student(name: &str) -> StudentInput {
        StudentInput {
            name: name.to_string(),
            grade: "5".to_string(),
            subjects: vec!["Math".to_string()],
            weak_topics: vec![],
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_assign_students_skips_existing() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "t@example.com").await;
        let mia = storage.create_student_impl(teacher, student("Mia")).await.unwrap();
        let leo = storage.create_student_impl(teacher, student("Leo")).await.unwrap();
        let assignment = storage
            .create_assignment_impl(new_assignment(teacher, "Fractions"))
            .await
            .unwrap();

        let first = storage
            .assign_students_impl(assignment.id, &[mia.id])
            .await
            .unwrap();
        assert_eq!(first.assigned, vec![mia.id]);

        let second = storage
            .assign_students_impl(assignment.id, &[mia.id, leo.id])
            .await
            .unwrap();
        assert_eq!(second.assigned, vec![leo.id]);
        assert_eq!(second.skipped, vec![mia.id]);

        let students = storage.list_assigned_students_impl(assignment.id).await.unwrap();
        let names: Vec<_> = students.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Leo", "Mia"]);

        let for_mia = storage.list_assignments_for_student_impl(mia.id).await.unwrap();
        assert_eq!(for_mia.len(), 1);
        assert_eq!(for_mia[0].title, "Fractions");
    }

    #[tokio::test]
    async fn test_partial_update_and_scoping() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "t@example.com").await;
        let other = seed_user(&storage, "o@example.com").await;
        let assignment = storage
            .create_assignment_impl(new_assignment(teacher, "Decimals"))
            .await
            .unwrap();

        let updated = storage
            .update_assignment_impl(
                teacher,
                assignment.id,
                UpdateAssignmentRequest {
                    due_date: Some("2026-11-01".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Decimals");
        assert_eq!(updated.subject.as_deref(), Some("Math"));
        assert_eq!(updated.due_date.as_deref(), Some("2026-11-01"));

        assert!(storage.get_assignment_impl(other, assignment.id).await.unwrap().is_none());
        assert!(
            storage
                .update_assignment_impl(other, assignment.id, UpdateAssignmentRequest::default())
                .await
                .unwrap()
                .is_none()
        );

        let missing_key = storage
            .update_assignment_impl(
                teacher,
                assignment.id,
                UpdateAssignmentRequest {
                    answer_key_id: Some(4242),
                    ..Default::default()
                },
            )
            .await;
        assert!(missing_key.is_err());
    }

    #[tokio::test]
    async fn test_delete_assignment_removes_links() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "t@example.com").await;
        let mia = storage.create_student_impl(teacher, student("Mia")).await.unwrap();
        let assignment = storage
            .create_assignment_impl(new_assignment(teacher, "Geometry"))
            .await
            .unwrap();
        storage.assign_students_impl(assignment.id, &[mia.id]).await.unwrap();

        assert!(storage.delete_assignment_impl(teacher, assignment.id).await.unwrap());
        assert!(storage.list_assignments_for_student_impl(mia.id).await.unwrap().is_empty());
        assert!(!storage.delete_assignment_impl(teacher, assignment.id).await.unwrap());
    }
}

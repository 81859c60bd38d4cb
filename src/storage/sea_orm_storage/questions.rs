use super::SeaOrmStorage;
use crate::entity::generated_questions::{ActiveModel, Column, Entity as GeneratedQuestions};
use crate::errors::{Result, TutorHubError};
use crate::models::questions::PracticeQuestion;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn save_generated_questions_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
        questions: &[PracticeQuestion],
    ) -> Result<()> {
        let model = ActiveModel {
            assignment_id: Set(assignment_id),
            student_id: Set(student_id),
            questions: Set(serde_json::to_string(questions)?),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("保存练习题失败: {e}")))?;

        Ok(())
    }

    /// 取最近一次生成的练习题
    pub async fn get_generated_questions_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Vec<PracticeQuestion>>> {
        let result = GeneratedQuestions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询练习题失败: {e}")))?;

        Ok(result.map(|m| m.into_practice_questions()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::models::assignments::entities::NewAssignment;
    use crate::models::questions::PracticeQuestion;
    use crate::models::students::requests::StudentInput;

    #[tokio::test]
    async fn test_latest_generated_questions_win() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "t@example.com").await;
        let student = storage
            .create_student_impl(
                teacher,
                StudentInput {
                    name: "Mia".to_string(),
                    grade: "5".to_string(),
                    subjects: vec!["Math".to_string()],
                    weak_topics: vec![],
                    avatar: None,
                },
            )
            .await
            .unwrap();
        let assignment = storage
            .create_assignment_impl(NewAssignment {
                created_by: teacher,
                title: "Fractions".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(
            storage
                .get_generated_questions_impl(assignment.id, student.id)
                .await
                .unwrap()
                .is_none()
        );

        storage
            .save_generated_questions_impl(
                assignment.id,
                student.id,
                &[PracticeQuestion::placeholder("Fractions")],
            )
            .await
            .unwrap();
        let newer = vec![PracticeQuestion {
            topic: "Decimals".to_string(),
            question: "What is 0.5 + 0.25?".to_string(),
        }];
        storage
            .save_generated_questions_impl(assignment.id, student.id, &newer)
            .await
            .unwrap();

        let stored = storage
            .get_generated_questions_impl(assignment.id, student.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, newer);
    }
}

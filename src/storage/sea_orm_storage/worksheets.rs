use super::SeaOrmStorage;
use crate::entity::encode_string_list;
use crate::entity::worksheets::{ActiveModel, Column, Entity as Worksheets};
use crate::errors::{Result, TutorHubError};
use crate::models::worksheets::entities::{
    NewWorksheet, Worksheet, WorksheetAnalysis, WorksheetStatus,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 记录上传的作答
    pub async fn create_worksheet_impl(&self, worksheet: NewWorksheet) -> Result<Worksheet> {
        let now = chrono::Utc::now().timestamp();
        let analysis = worksheet.analysis;

        let model = ActiveModel {
            student_id: Set(worksheet.student_id),
            assignment_id: Set(worksheet.assignment_id),
            answer_key_id: Set(worksheet.answer_key_id),
            answer_key_url: Set(worksheet.answer_key_url),
            file_name: Set(worksheet.file_name),
            file_url: Set(worksheet.file_url),
            storage_bucket: Set(worksheet.storage_bucket),
            storage_path: Set(worksheet.storage_path),
            status: Set(worksheet.status.to_string()),
            score: Set(analysis.as_ref().map(|a| a.score)),
            weak_topics: Set(analysis.as_ref().map(|a| encode_string_list(&a.weak_topics))),
            ai_suggestions: Set(analysis.as_ref().map(|a| encode_string_list(&a.suggestions))),
            upload_date: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("保存作答失败: {e}")))?;

        Ok(result.into_worksheet())
    }

    pub async fn get_worksheet_impl(&self, id: i64) -> Result<Option<Worksheet>> {
        let result = Worksheets::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询作答失败: {e}")))?;

        Ok(result.map(|m| m.into_worksheet()))
    }

    pub async fn list_worksheets_for_student_impl(&self, student_id: i64) -> Result<Vec<Worksheet>> {
        let worksheets = Worksheets::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::UploadDate)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询作答列表失败: {e}")))?;

        Ok(worksheets.into_iter().map(|m| m.into_worksheet()).collect())
    }

    /// 更新分析状态；没有结果时保留原有分数
    pub async fn update_worksheet_analysis_impl(
        &self,
        id: i64,
        status: WorksheetStatus,
        analysis: Option<WorksheetAnalysis>,
    ) -> Result<Option<Worksheet>> {
        if self.get_worksheet_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            status: Set(status.to_string()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(analysis) = analysis {
            model.score = Set(Some(analysis.score));
            model.weak_topics = Set(Some(encode_string_list(&analysis.weak_topics)));
            model.ai_suggestions = Set(Some(encode_string_list(&analysis.suggestions)));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("更新作答失败: {e}")))?;

        Ok(Some(result.into_worksheet()))
    }

    pub async fn delete_worksheet_impl(&self, id: i64) -> Result<bool> {
        let result = Worksheets::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("删除作答失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn get_latest_worksheet_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Worksheet>> {
        let result = Worksheets::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::UploadDate)
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询作答失败: {e}")))?;

        Ok(result.map(|m| m.into_worksheet()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::models::students::requests::StudentInput;
    use crate::models::worksheets::entities::{NewWorksheet, WorksheetAnalysis, WorksheetStatus};

    fn upload(student_id: i64, assignment_id: Option<i64>, name: &str) -> NewWorksheet {
        NewWorksheet {
            student_id,
            assignment_id,
            answer_key_id: None,
            answer_key_url: None,
            file_name: name.to_string(),
            file_url: format!("http://localhost/api/files/worksheets/{name}"),
            storage_bucket: "worksheets".to_string(),
            storage_path: name.to_string(),
            status: WorksheetStatus::Analyzing,
            analysis: None,
        }
    }

    async fn seed_student(storage: &super::SeaOrmStorage) -> i64 {
        let teacher = seed_user(storage, "t@example.com").await;
        storage
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
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_worksheet_analysis_lifecycle() {
        let storage = memory_storage().await;
        let student_id = seed_student(&storage).await;

        let worksheet = storage
            .create_worksheet_impl(upload(student_id, None, "a.pdf"))
            .await
            .unwrap();
        assert_eq!(worksheet.status, WorksheetStatus::Analyzing);
        assert!(worksheet.score.is_none());

        let done = storage
            .update_worksheet_analysis_impl(
                worksheet.id,
                WorksheetStatus::Completed,
                Some(WorksheetAnalysis {
                    score: 72,
                    weak_topics: vec!["Fractions".to_string()],
                    suggestions: vec!["Review fractions".to_string()],
                }),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(done.status, WorksheetStatus::Completed);
        assert_eq!(done.score, Some(72));
        assert_eq!(done.weak_topics, Some(vec!["Fractions".to_string()]));

        let failed = storage
            .update_worksheet_analysis_impl(worksheet.id, WorksheetStatus::Failed, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(failed.status, WorksheetStatus::Failed);
        assert_eq!(failed.score, Some(72));

        assert!(storage.delete_worksheet_impl(worksheet.id).await.unwrap());
        assert!(storage.get_worksheet_impl(worksheet.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_latest_worksheet_for_assignment() {
        let storage = memory_storage().await;
        let student_id = seed_student(&storage).await;
        let teacher = storage
            .get_user_by_email_impl("t@example.com")
            .await
            .unwrap()
            .unwrap()
            .id;
        let assignment = storage
            .create_assignment_impl(crate::models::assignments::entities::NewAssignment {
                created_by: teacher,
                title: "Fractions".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        storage
            .create_worksheet_impl(upload(student_id, Some(assignment.id), "first.pdf"))
            .await
            .unwrap();
        storage
            .create_worksheet_impl(upload(student_id, Some(assignment.id), "second.pdf"))
            .await
            .unwrap();
        storage
            .create_worksheet_impl(upload(student_id, None, "loose.pdf"))
            .await
            .unwrap();

        let latest = storage
            .get_latest_worksheet_impl(assignment.id, student_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.file_name, "second.pdf");

        let list = storage.list_worksheets_for_student_impl(student_id).await.unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].file_name, "loose.pdf");
    }
}

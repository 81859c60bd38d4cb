use serde::Deserialize;
use ts_rs::TS;

// 更新作业请求，只修改提供的字段
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub grade: Option<String>,
    pub due_date: Option<String>,
    pub answer_key_id: Option<i64>,
}

impl UpdateAssignmentRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.subject.is_none()
            && self.grade.is_none()
            && self.due_date.is_none()
            && self.answer_key_id.is_none()
    }
}

// 分配学生请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignStudentsRequest {
    pub student_ids: Option<Vec<i64>>,
}

use serde::Serialize;
use ts_rs::TS;

use super::entities::Student;

// 学生响应，字段名与前端保持一致
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentResponse {
    pub id: i64,
    pub name: String,
    pub grade: String,
    pub subjects: Vec<String>,
    pub weak_topics: Vec<String>,
    pub last_activity: String,
    pub avatar: Option<String>,
}

impl StudentResponse {
    /// 新建学生时前端显示 "Just added"
    pub fn just_added(student: Student) -> Self {
        let mut resp = Self::from(student);
        resp.last_activity = "Just added".to_string();
        resp
    }
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            name: student.name,
            grade: student.grade,
            subjects: student.subjects,
            weak_topics: student.weak_topics,
            last_activity: student.last_activity.to_rfc3339(),
            avatar: student.avatar,
        }
    }
}

use actix_web::{HttpResponse, http::StatusCode};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::TutorHubError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// 将内部错误映射为 HTTP 响应，未分类的错误统一按 500 处理
    pub fn from_error(err: &TutorHubError) -> HttpResponse {
        let (status, code) = match err {
            TutorHubError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::ValidationFailed),
            TutorHubError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            TutorHubError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized),
            TutorHubError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
            TutorHubError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Conflict),
            TutorHubError::UnsupportedFileType(_) => {
                (StatusCode::BAD_REQUEST, ErrorCode::FileTypeNotAllowed)
            }
            TutorHubError::TextExtraction(_) | TutorHubError::Llm(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::WorksheetAnalysisFailed,
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
            ),
        };

        if status.is_server_error() {
            tracing::error!("{}", err);
        }

        HttpResponse::build(status).json(Self::error_empty(code, err.message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_error_status_mapping() {
        let resp = ApiResponse::from_error(&TutorHubError::validation("bad"));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = ApiResponse::from_error(&TutorHubError::not_found("missing"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = ApiResponse::from_error(&TutorHubError::conflict("taken"));
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = ApiResponse::from_error(&TutorHubError::database_operation("boom"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

//! 健康检查与未匹配路由的兜底响应

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde::Serialize;
use ts_rs::TS;

use crate::models::{ApiResponse, ErrorCode};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/health.ts")]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

pub struct HealthService;

impl HealthService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn health(&self) -> ActixResult<HttpResponse> {
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            HealthStatus {
                status: "OK".to_string(),
                message: "Server is running".to_string(),
                timestamp: chrono::Utc::now(),
            },
            "Server is running",
        )))
    }

    /// 未匹配任何路由时返回 404
    pub async fn not_found(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        tracing::debug!("No route for {} {}", request.method(), request.path());
        Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            format!("Route {} {} not found", request.method(), request.path()),
        )))
    }
}

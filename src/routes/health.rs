use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::HealthService;

static HEALTH_SERVICE: Lazy<HealthService> = Lazy::new(HealthService::new_lazy);

pub async fn health() -> ActixResult<HttpResponse> {
    HEALTH_SERVICE.health().await
}

// 作为 App 的 default_service 使用
pub async fn route_not_found(request: HttpRequest) -> ActixResult<HttpResponse> {
    HEALTH_SERVICE.not_found(&request).await
}

pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}

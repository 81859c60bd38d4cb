use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::worksheets::requests::WorksheetWithAnswerKeyQuery;
use crate::services::WorksheetService;
use crate::utils::SafeIDI64;

// 懒加载的全局 WorksheetService 实例
static WORKSHEET_SERVICE: Lazy<WorksheetService> = Lazy::new(WorksheetService::new_lazy);

pub async fn upload_worksheet(
    req: HttpRequest,
    student_id: SafeIDI64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    WORKSHEET_SERVICE
        .upload_worksheet(&req, student_id.0, payload)
        .await
}

pub async fn list_worksheets(req: HttpRequest, student_id: SafeIDI64) -> ActixResult<HttpResponse> {
    WORKSHEET_SERVICE.list_worksheets(&req, student_id.0).await
}

pub async fn upload_with_answer_key(
    req: HttpRequest,
    student_id: SafeIDI64,
    query: web::Query<WorksheetWithAnswerKeyQuery>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    WORKSHEET_SERVICE
        .upload_with_answer_key(&req, student_id.0, query.into_inner(), payload)
        .await
}

pub async fn delete_worksheet(
    req: HttpRequest,
    worksheet_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    WORKSHEET_SERVICE.delete_worksheet(&req, worksheet_id.0).await
}

// 配置路由
// 这里只注册完整路径的资源，不占用 `/api/students` 前缀
pub fn configure_worksheets_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/students/{id}/worksheets")
            .wrap(middlewares::RequireJWT)
            .route(web::get().to(list_worksheets))
            .route(
                web::post()
                    .to(upload_worksheet)
                    .wrap(RateLimit::file_upload()),
            ),
    )
    .service(
        web::resource("/api/students/{id}/worksheet-with-answer-key")
            .wrap(middlewares::RequireJWT)
            .route(
                web::post()
                    .to(upload_with_answer_key)
                    .wrap(RateLimit::file_upload()),
            ),
    )
    .service(
        web::resource("/api/worksheets/{id}")
            .wrap(middlewares::RequireJWT)
            .route(web::delete().to(delete_worksheet)),
    );
}

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::answer_keys::requests::AnswerKeyQuery;
use crate::services::AnswerKeyService;

// 懒加载的全局 AnswerKeyService 实例
static ANSWER_KEY_SERVICE: Lazy<AnswerKeyService> = Lazy::new(AnswerKeyService::new_lazy);

pub async fn upload_answer_key(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    ANSWER_KEY_SERVICE.upload_answer_key(&req, payload).await
}

pub async fn list_answer_keys(
    req: HttpRequest,
    query: web::Query<AnswerKeyQuery>,
) -> ActixResult<HttpResponse> {
    ANSWER_KEY_SERVICE
        .list_answer_keys(&req, query.into_inner())
        .await
}

// 配置路由
pub fn configure_answer_keys_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/answer-keys")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_answer_keys))
                    // 上传按用户限流
                    .route(
                        web::post()
                            .to(upload_answer_key)
                            .wrap(RateLimit::file_upload()),
                    ),
            ),
    );
}

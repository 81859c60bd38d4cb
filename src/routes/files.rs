use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, middleware, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::FileService;

// 懒加载的全局 FileService 实例
static FILE_SERVICE: Lazy<FileService> = Lazy::new(FileService::new_lazy);

pub async fn handle_download(
    request: HttpRequest,
    location: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (bucket, path) = location.into_inner();
    FILE_SERVICE.handle_download(&request, bucket, path).await
}

// 配置路由
pub fn configure_file_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/files")
            .wrap(middlewares::RequireJWT)
            .wrap(middleware::Compress::default())
            .route("/{bucket}/{path:.*}", web::get().to(handle_download)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::ObjectStore;
    use crate::services::test_support::TestState;
    use actix_web::{App, test};

    #[actix_web::test]
    async fn test_download_stored_object() {
        let state = TestState::new().await;
        state
            .object_store
            .put("worksheets", "worksheets/1/1_mia.txt", b"1. 0.75")
            .await
            .unwrap();
        let app = test::init_service(
            App::new()
                .app_data(state.storage_data())
                .app_data(state.cache_data())
                .app_data(state.object_store_data())
                .configure(configure_file_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/files/worksheets/worksheets/1/1_mia.txt")
            .insert_header(state.bearer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(test::read_body(resp).await, "1. 0.75");

        let req = test::TestRequest::get()
            .uri("/api/files/worksheets/worksheets/1/missing.txt")
            .insert_header(state.bearer())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 404);

        let req = test::TestRequest::get()
            .uri("/api/files/photos/a.txt")
            .insert_header(state.bearer())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);

        let req = test::TestRequest::get()
            .uri("/api/files/worksheets/worksheets/1/1_mia.txt")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);
    }
}

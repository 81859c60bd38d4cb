use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::students::requests::StudentRequest;
use crate::services::StudentService;
use crate::utils::SafeIDI64;

// 懒加载的全局 StudentService 实例
static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn list_students(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(&req).await
}

pub async fn create_student(
    req: HttpRequest,
    student_data: web::Json<StudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .create_student(&req, student_data.into_inner())
        .await
}

pub async fn get_student(req: HttpRequest, student_id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(&req, student_id.0).await
}

pub async fn update_student(
    req: HttpRequest,
    student_id: SafeIDI64,
    student_data: web::Json<StudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(&req, student_id.0, student_data.into_inner())
        .await
}

pub async fn delete_student(req: HttpRequest, student_id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.delete_student(&req, student_id.0).await
}

// 配置路由
pub fn configure_students_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/students")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_students))
                    .route(web::post().to(create_student)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_student))
                    .route(web::put().to(update_student))
                    .route(web::delete().to(delete_student)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::TestState;
    use actix_web::{App, test};
    use serde_json::json;

    #[actix_web::test]
    async fn test_student_crud() {
        let state = TestState::new().await;
        let app = test::init_service(
            App::new()
                .app_data(state.storage_data())
                .app_data(state.cache_data())
                .configure(configure_students_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/students")
            .insert_header(state.bearer())
            .set_json(json!({"name": "Mia", "grade": "5", "subjects": ["Math"]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["lastActivity"], "Just added");
        assert_eq!(body["data"]["weakTopics"], json!([]));
        let id = body["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/students/{id}"))
            .insert_header(state.bearer())
            .set_json(json!({
                "name": "Mia",
                "grade": "6",
                "subjects": ["Math", "Science"],
                "weakTopics": ["Fractions"]
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["grade"], "6");
        assert_eq!(body["data"]["weakTopics"], json!(["Fractions"]));

        let req = test::TestRequest::get()
            .uri("/api/students")
            .insert_header(state.bearer())
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/students/{id}"))
            .insert_header(state.bearer())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);

        let req = test::TestRequest::get()
            .uri(&format!("/api/students/{id}"))
            .insert_header(state.bearer())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 404);
    }

    #[actix_web::test]
    async fn test_student_validation_and_ownership() {
        let state = TestState::new().await;
        let other_token = state.other_tutor_token().await;
        let app = test::init_service(
            App::new()
                .app_data(state.storage_data())
                .app_data(state.cache_data())
                .configure(configure_students_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/students")
            .insert_header(state.bearer())
            .set_json(json!({"name": "Leo", "grade": "4", "subjects": []}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);

        let req = test::TestRequest::post()
            .uri("/api/students")
            .insert_header(state.bearer())
            .set_json(json!({"name": "Leo", "grade": "4", "subjects": ["Reading"]}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let id = body["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/api/students/{id}"))
            .insert_header(("Authorization", format!("Bearer {other_token}")))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 404);

        let req = test::TestRequest::get()
            .uri("/api/students/abc")
            .insert_header(state.bearer())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);
    }
}

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::assignments::requests::{AssignStudentsRequest, UpdateAssignmentRequest};
use crate::services::AssignmentService;
use crate::utils::{SafeAssignmentIdI64, SafeIDI64, SafeStudentIdI64};

// 懒加载的全局 AssignmentService 实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);

pub async fn list_assignments(req: HttpRequest) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.list_assignments(&req).await
}

pub async fn create_assignment(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.create_assignment(&req, payload).await
}

pub async fn get_assignment(
    req: HttpRequest,
    assignment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.get_assignment(&req, assignment_id.0).await
}

pub async fn update_assignment(
    req: HttpRequest,
    assignment_id: SafeIDI64,
    update_data: web::Json<UpdateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_assignment(&req, assignment_id.0, update_data.into_inner())
        .await
}

pub async fn delete_assignment(
    req: HttpRequest,
    assignment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .delete_assignment(&req, assignment_id.0)
        .await
}

pub async fn list_student_assignments(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_student_assignments(&req, student_id.0)
        .await
}

pub async fn assign_students(
    req: HttpRequest,
    assignment_id: SafeIDI64,
    assign_data: web::Json<AssignStudentsRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .assign_students(&req, assignment_id.0, assign_data.into_inner())
        .await
}

pub async fn upload_answer_key(
    req: HttpRequest,
    assignment_id: SafeIDI64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .upload_answer_key(&req, assignment_id.0, payload)
        .await
}

pub async fn upload_worksheet(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    student_id: SafeStudentIdI64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .upload_worksheet(&req, assignment_id.0, student_id.0, payload)
        .await
}

pub async fn generate_questions(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .generate_questions(&req, assignment_id.0, student_id.0)
        .await
}

pub async fn get_generated_questions(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .get_generated_questions(&req, assignment_id.0, student_id.0)
        .await
}

// 配置路由
pub fn configure_assignments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/assignments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_assignments))
                    .route(
                        web::post()
                            .to(create_assignment)
                            .wrap(RateLimit::file_upload()),
                    ),
            )
            .service(
                web::resource("/student/{student_id}")
                    .route(web::get().to(list_student_assignments)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_assignment))
                    .route(web::put().to(update_assignment))
                    .route(web::delete().to(delete_assignment)),
            )
            .service(web::resource("/{id}/assign").route(web::post().to(assign_students)))
            .service(
                web::resource("/{id}/answer-key").route(
                    web::post()
                        .to(upload_answer_key)
                        .wrap(RateLimit::file_upload()),
                ),
            )
            .service(
                web::scope("/{assignment_id}/students/{student_id}")
                    .service(
                        web::resource("/worksheet").route(
                            web::post()
                                .to(upload_worksheet)
                                .wrap(RateLimit::file_upload()),
                        ),
                    )
                    .service(
                        // 会调用 LLM
                        web::resource("/generate-questions")
                            .route(web::post().to(generate_questions).wrap(RateLimit::ai())),
                    )
                    .service(
                        web::resource("/generated-questions")
                            .route(web::get().to(get_generated_questions)),
                    ),
            ),
    );
}

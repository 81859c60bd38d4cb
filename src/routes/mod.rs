pub mod answer_keys;

pub mod assignments;

pub mod auth;

pub mod files;

pub mod health;

pub mod students;

pub mod worksheets;

pub use answer_keys::configure_answer_keys_routes;
pub use assignments::configure_assignments_routes;
pub use auth::configure_auth_routes;
pub use files::configure_file_routes;
pub use health::{configure_health_routes, route_not_found};
pub use students::configure_students_routes;
pub use worksheets::configure_worksheets_routes;

/// 注册全部 API 路由
///
/// 学生作答路由挂在 `/api/students/{id}` 下，需要先于学生路由注册。
pub fn configure_api_routes(cfg: &mut actix_web::web::ServiceConfig) {
    configure_health_routes(cfg);
    configure_auth_routes(cfg);
    configure_worksheets_routes(cfg);
    configure_students_routes(cfg);
    configure_answer_keys_routes(cfg);
    configure_assignments_routes(cfg);
    configure_file_routes(cfg);
}

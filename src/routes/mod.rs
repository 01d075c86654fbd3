pub mod academic;
pub mod announcements;
pub mod attendance;
pub mod auth;
pub mod files;
pub mod grading;
pub mod library;
pub mod profiles;
pub mod users;

pub use academic::configure_academic_routes;
pub use announcements::configure_announcement_routes;
pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use files::configure_file_routes;
pub use grading::configure_grading_routes;
pub use library::configure_library_routes;
pub use profiles::configure_profile_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部 API 路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_profile_routes)
        .configure(configure_academic_routes)
        .configure(configure_grading_routes)
        .configure(configure_attendance_routes)
        .configure(configure_library_routes)
        .configure(configure_announcement_routes)
        .configure(configure_file_routes);
}

use actix_web::web;
use crate::handlers::auth_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/register", web::post().to(auth_handlers::register))
            .route("/register/vendor", web::post().to(auth_handlers::register_vendor))
            .route("/login", web::post().to(auth_handlers::login)),
    );
}

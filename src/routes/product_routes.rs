use actix_web::web;
use crate::handlers::product_handlers;
use crate::middleware::RequireAuth;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/products")
            .wrap(RequireAuth)
            .route("", web::get().to(product_handlers::list_catalog)),
    );
}

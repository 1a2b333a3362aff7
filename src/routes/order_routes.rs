use actix_web::web;
use crate::handlers::order_handlers;
use crate::middleware::RequireAuth;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/orders")
            .wrap(RequireAuth)
            .route("", web::post().to(order_handlers::checkout))
            .route("", web::get().to(order_handlers::my_orders)),
    );
}

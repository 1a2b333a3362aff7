use actix_web::web;
use crate::handlers::vendor_handlers;
use crate::middleware::RequireAuth;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/vendors")
            .wrap(RequireAuth)
            .route("/profile", web::post().to(vendor_handlers::create_profile))
            .route("/profile", web::get().to(vendor_handlers::get_profile))
            .route("/profile", web::put().to(vendor_handlers::update_profile))
            .route("/products", web::get().to(vendor_handlers::list_products))
            .route("/products", web::post().to(vendor_handlers::add_product))
            .route("/products/{product_id}", web::put().to(vendor_handlers::update_product))
            .route("/products/{product_id}", web::delete().to(vendor_handlers::delete_product))
            .route("/orders", web::get().to(vendor_handlers::list_orders))
            .route("/orders/{order_id}", web::put().to(vendor_handlers::update_order_status)),
    );
}

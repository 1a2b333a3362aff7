use actix_web::web;
use crate::handlers::cart_handlers;
use crate::middleware::RequireAuth;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/cart")
            .wrap(RequireAuth)
            .route("", web::get().to(cart_handlers::get_cart))
            .route("", web::delete().to(cart_handlers::clear_cart))
            .route("/items", web::post().to(cart_handlers::add_item))
            .route("/items/{product_id}", web::put().to(cart_handlers::set_item))
            .route("/items/{product_id}", web::delete().to(cart_handlers::remove_item)),
    );
}

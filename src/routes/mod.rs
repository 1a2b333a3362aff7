mod auth_routes;
mod vendor_routes;
mod product_routes;
mod cart_routes;
mod order_routes;

pub use auth_routes::configure as configure_auth_routes;
pub use vendor_routes::configure as configure_vendor_routes;
pub use product_routes::configure as configure_product_routes;
pub use cart_routes::configure as configure_cart_routes;
pub use order_routes::configure as configure_order_routes;

pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    configure_auth_routes(cfg);
    configure_vendor_routes(cfg);
    configure_product_routes(cfg);
    configure_cart_routes(cfg);
    configure_order_routes(cfg);
}

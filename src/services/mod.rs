mod mongodb;
mod token_service;
mod auth_service;
mod vendor_service;

pub use auth_service::AuthService;
pub use mongodb::MongoDBService;
pub use token_service::{Claims, TokenService};
pub use vendor_service::VendorService;

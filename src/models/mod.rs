pub mod user;
pub mod vendor;
pub mod product;
pub mod order;
pub mod cart;
pub mod error;

pub use user::{
    AuthResponse, LoginRequest, RegisterRequest, RegisterVendorRequest, Role, User, UserResponse,
    VendorAuthResponse,
};
pub use vendor::{UpdateVendorProfileRequest, Vendor, VendorProfileRequest};
pub use product::{CreateProductRequest, Product, ProductListing, UpdateProductRequest};
pub use order::{
    Order, OrderItem, OrderItemView, OrderStatus, UpdateOrderStatusRequest, VendorOrderView,
};
pub use cart::{AddCartItemRequest, Cart, CartItem, SetCartItemRequest};
pub use error::{ApiError, ErrorResponse};

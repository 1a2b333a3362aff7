use actix_web::{web, HttpResponse};
use log::info;
use serde_json::json;

use crate::middleware::Identity;
use crate::models::{
    ApiError, CreateProductRequest, UpdateOrderStatusRequest, UpdateProductRequest,
    UpdateVendorProfileRequest, VendorProfileRequest,
};
use crate::services::VendorService;

// ---- profile ----

pub async fn create_profile(
    identity: Identity,
    vendors: web::Data<VendorService>,
    payload: web::Json<VendorProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Creating vendor profile for user {}", identity.user_id);
    let vendor = vendors.create_profile(&identity, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(vendor))
}

pub async fn get_profile(
    identity: Identity,
    vendors: web::Data<VendorService>,
) -> Result<HttpResponse, ApiError> {
    let vendor = vendors.get_profile(&identity).await?;
    Ok(HttpResponse::Ok().json(vendor))
}

pub async fn update_profile(
    identity: Identity,
    vendors: web::Data<VendorService>,
    payload: web::Json<UpdateVendorProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Updating vendor profile for user {}", identity.user_id);
    let vendor = vendors.update_profile(&identity, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(vendor))
}

// ---- products ----

pub async fn list_products(
    identity: Identity,
    vendors: web::Data<VendorService>,
) -> Result<HttpResponse, ApiError> {
    let products = vendors.list_products(&identity).await?;
    Ok(HttpResponse::Ok().json(products))
}

pub async fn add_product(
    identity: Identity,
    vendors: web::Data<VendorService>,
    payload: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Vendor user {} adding product {}", identity.user_id, payload.name);
    let product = vendors.add_product(&identity, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(product))
}

pub async fn update_product(
    identity: Identity,
    vendors: web::Data<VendorService>,
    product_id: web::Path<String>,
    payload: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, ApiError> {
    let product = vendors
        .update_product(&identity, &product_id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(product))
}

pub async fn delete_product(
    identity: Identity,
    vendors: web::Data<VendorService>,
    product_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    vendors.delete_product(&identity, &product_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Product deleted successfully" })))
}

// ---- orders ----

pub async fn list_orders(
    identity: Identity,
    vendors: web::Data<VendorService>,
) -> Result<HttpResponse, ApiError> {
    let orders = vendors.list_orders(&identity).await?;
    Ok(HttpResponse::Ok().json(orders))
}

pub async fn update_order_status(
    identity: Identity,
    vendors: web::Data<VendorService>,
    order_id: web::Path<String>,
    payload: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse, ApiError> {
    info!(
        "Vendor user {} setting order {} status to {}",
        identity.user_id, order_id, payload.status
    );
    let order = vendors
        .update_order_status(&identity, &order_id, &payload.status)
        .await?;
    Ok(HttpResponse::Ok().json(order))
}

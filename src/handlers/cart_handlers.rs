use actix_web::{web, HttpResponse};
use log::info;
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use crate::middleware::Identity;
use crate::models::{AddCartItemRequest, ApiError, SetCartItemRequest};
use crate::services::MongoDBService;

pub async fn get_cart(
    identity: Identity,
    db: web::Data<MongoDBService>,
) -> Result<HttpResponse, ApiError> {
    let cart = db.find_cart(&identity.user_id).await?;
    Ok(HttpResponse::Ok().json(cart))
}

/// Adds a quantity of a product, merging with any existing entry. The
/// product must exist and be available.
pub async fn add_item(
    identity: Identity,
    db: web::Data<MongoDBService>,
    payload: web::Json<AddCartItemRequest>,
) -> Result<HttpResponse, ApiError> {
    if payload.quantity < 1 {
        return Err(ApiError::ValidationError(
            "quantity must be at least 1".to_string(),
        ));
    }
    let product_id = ObjectId::parse_str(&payload.product_id)
        .map_err(|_| ApiError::NotFound("Product not found".to_string()))?;
    let products = db.find_products_by_ids(&[product_id]).await?;
    let product = products
        .first()
        .filter(|p| p.is_available)
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    let mut cart = db.find_cart(&identity.user_id).await?;
    cart.add_item(product_id, payload.quantity);
    db.save_cart(&cart).await?;
    info!(
        "User {} added {} x {} to cart",
        identity.email, payload.quantity, product.name
    );
    Ok(HttpResponse::Ok().json(cart))
}

/// Sets the quantity for a cart entry; quantities below 1 remove it.
pub async fn set_item(
    identity: Identity,
    db: web::Data<MongoDBService>,
    product_id: web::Path<String>,
    payload: web::Json<SetCartItemRequest>,
) -> Result<HttpResponse, ApiError> {
    if payload.quantity > i64::from(u32::MAX) {
        return Err(ApiError::ValidationError(
            "quantity is too large".to_string(),
        ));
    }
    let product_id = ObjectId::parse_str(product_id.as_str())
        .map_err(|_| ApiError::NotFound("Product not found".to_string()))?;

    let mut cart = db.find_cart(&identity.user_id).await?;
    cart.set_item(product_id, payload.quantity);
    db.save_cart(&cart).await?;
    Ok(HttpResponse::Ok().json(cart))
}

pub async fn remove_item(
    identity: Identity,
    db: web::Data<MongoDBService>,
    product_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let product_id = ObjectId::parse_str(product_id.as_str())
        .map_err(|_| ApiError::NotFound("Product not found".to_string()))?;

    let mut cart = db.find_cart(&identity.user_id).await?;
    cart.remove_item(&product_id);
    db.save_cart(&cart).await?;
    Ok(HttpResponse::Ok().json(cart))
}

pub async fn clear_cart(
    identity: Identity,
    db: web::Data<MongoDBService>,
) -> Result<HttpResponse, ApiError> {
    db.clear_cart(&identity.user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Cart cleared" })))
}

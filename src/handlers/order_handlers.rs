use actix_web::{web, HttpResponse};
use log::info;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;

use crate::middleware::Identity;
use crate::models::{ApiError, Order, OrderItem, OrderStatus, Product};
use crate::services::MongoDBService;

/// Checkout: turns the caller's cart into one pending order per vendor,
/// snapshotting discounted unit prices, then clears the cart.
pub async fn checkout(
    identity: Identity,
    db: web::Data<MongoDBService>,
) -> Result<HttpResponse, ApiError> {
    let cart = db.find_cart(&identity.user_id).await?;
    if cart.items.is_empty() {
        return Err(ApiError::ValidationError("Cart is empty".to_string()));
    }

    let product_ids: Vec<ObjectId> = cart.items.iter().map(|item| item.product).collect();
    let products: HashMap<ObjectId, Product> = db
        .find_products_by_ids(&product_ids)
        .await?
        .into_iter()
        .filter_map(|p| p.id.map(|id| (id, p)))
        .collect();

    // Group line items per vendor, skipping products that vanished since
    // they were carted
    let mut per_vendor: HashMap<ObjectId, Vec<OrderItem>> = HashMap::new();
    for item in &cart.items {
        let product = match products.get(&item.product) {
            Some(p) if p.is_available => p,
            _ => continue,
        };
        per_vendor
            .entry(product.vendor)
            .or_default()
            .push(OrderItem {
                product: item.product,
                quantity: item.quantity,
                unit_price: discounted_price(product.price, product.discount),
            });
    }

    if per_vendor.is_empty() {
        return Err(ApiError::ValidationError(
            "No purchasable items in cart".to_string(),
        ));
    }

    let now = chrono::Utc::now().timestamp_millis();
    let mut created = Vec::with_capacity(per_vendor.len());
    for (vendor, items) in per_vendor {
        let total = items
            .iter()
            .map(|i| i.unit_price * f64::from(i.quantity))
            .sum();
        let order = Order {
            id: None,
            customer: identity.user_id,
            vendor,
            items,
            status: OrderStatus::Pending,
            total,
            created_at: now,
            updated_at: now,
        };
        created.push(db.insert_order(order).await?);
    }

    db.clear_cart(&identity.user_id).await?;
    info!(
        "User {} checked out {} order(s)",
        identity.email,
        created.len()
    );
    Ok(HttpResponse::Created().json(created))
}

pub async fn my_orders(
    identity: Identity,
    db: web::Data<MongoDBService>,
) -> Result<HttpResponse, ApiError> {
    let orders = db.orders_by_customer(&identity.user_id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

fn discounted_price(price: f64, discount: f64) -> f64 {
    price * (100.0 - discount) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_is_applied_as_percent_off() {
        assert_eq!(discounted_price(1000.0, 0.0), 1000.0);
        assert_eq!(discounted_price(1000.0, 25.0), 750.0);
        assert_eq!(discounted_price(1000.0, 100.0), 0.0);
    }
}

use actix_web::web;
use log::info;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use std::str::FromStr;

use crate::middleware::Identity;
use crate::models::{
    ApiError, CreateProductRequest, Order, OrderItemView, OrderStatus, Product,
    UpdateProductRequest, UpdateVendorProfileRequest, Vendor, VendorOrderView,
    VendorProfileRequest,
};
use crate::services::MongoDBService;

/// Vendor-scoped operations. Every method resolves the caller's vendor
/// record first, so nothing here can touch another vendor's data.
#[derive(Clone)]
pub struct VendorService {
    db: web::Data<MongoDBService>,
}

impl VendorService {
    pub fn new(db: web::Data<MongoDBService>) -> Self {
        Self { db }
    }

    async fn resolve_vendor(&self, identity: &Identity) -> Result<Vendor, ApiError> {
        identity.require_vendor()?;
        self.db
            .find_vendor_by_user(&identity.user_id)
            .await?
            .ok_or(ApiError::VendorProfileNotFound)
    }

    // ---- profile ----

    pub async fn create_profile(
        &self,
        identity: &Identity,
        request: VendorProfileRequest,
    ) -> Result<Vendor, ApiError> {
        identity.require_vendor()?;
        if self
            .db
            .find_vendor_by_user(&identity.user_id)
            .await?
            .is_some()
        {
            return Err(ApiError::ValidationError(
                "Vendor profile already exists".to_string(),
            ));
        }
        validate_profile_fields(Some(request.store_name.as_str()), Some(request.address.as_str()))?;

        let vendor = Vendor::new(
            identity.user_id,
            request.store_name,
            request.address,
            request.delivery_pricing_per_km,
        );
        self.db.insert_vendor(vendor).await
    }

    pub async fn get_profile(&self, identity: &Identity) -> Result<Vendor, ApiError> {
        self.resolve_vendor(identity).await
    }

    pub async fn update_profile(
        &self,
        identity: &Identity,
        request: UpdateVendorProfileRequest,
    ) -> Result<Vendor, ApiError> {
        identity.require_vendor()?;
        validate_profile_fields(request.store_name.as_deref(), request.address.as_deref())?;
        self.db
            .update_vendor_profile(&identity.user_id, request)
            .await
    }

    // ---- products ----

    pub async fn list_products(&self, identity: &Identity) -> Result<Vec<Product>, ApiError> {
        let vendor = self.resolve_vendor(identity).await?;
        self.db
            .products_by_vendor(&vendor.id.ok_or_else(missing_vendor_id)?)
            .await
    }

    pub async fn add_product(
        &self,
        identity: &Identity,
        request: CreateProductRequest,
    ) -> Result<Product, ApiError> {
        let vendor = self.resolve_vendor(identity).await?;
        validate_product_fields(
            Some(&request.name),
            Some(&request.description),
            Some(request.price),
            Some(&request.category),
            request.discount,
        )?;

        let now = chrono::Utc::now().timestamp_millis();
        let product = Product {
            id: None,
            vendor: vendor.id.ok_or_else(missing_vendor_id)?,
            name: request.name,
            description: request.description,
            price: request.price,
            category: request.category,
            discount: request.discount.unwrap_or(0.0),
            stock: request.stock,
            image: request.image,
            is_available: true,
            created_at: now,
            updated_at: now,
        };
        let product = self.db.insert_product(product).await?;
        info!(
            "Vendor {} added product {}",
            vendor.store_name,
            product.id.map(|id| id.to_hex()).unwrap_or_default()
        );
        Ok(product)
    }

    pub async fn update_product(
        &self,
        identity: &Identity,
        product_id: &str,
        request: UpdateProductRequest,
    ) -> Result<Product, ApiError> {
        let vendor = self.resolve_vendor(identity).await?;
        validate_product_fields(
            request.name.as_deref(),
            request.description.as_deref(),
            request.price,
            request.category.as_deref(),
            request.discount,
        )?;
        let product_id = parse_object_id(product_id, "Product not found")?;
        self.db
            .update_product_scoped(&product_id, &vendor.id.ok_or_else(missing_vendor_id)?, request)
            .await
    }

    pub async fn delete_product(
        &self,
        identity: &Identity,
        product_id: &str,
    ) -> Result<(), ApiError> {
        let vendor = self.resolve_vendor(identity).await?;
        let product_id = parse_object_id(product_id, "Product not found")?;
        self.db
            .delete_product_scoped(&product_id, &vendor.id.ok_or_else(missing_vendor_id)?)
            .await
    }

    // ---- orders ----

    pub async fn list_orders(&self, identity: &Identity) -> Result<Vec<VendorOrderView>, ApiError> {
        let vendor = self.resolve_vendor(identity).await?;
        let orders = self
            .db
            .orders_by_vendor(&vendor.id.ok_or_else(missing_vendor_id)?)
            .await?;
        self.populate_orders(orders).await
    }

    /// Updates an order's status. The raw string is checked against the
    /// status enumeration before any write is attempted.
    pub async fn update_order_status(
        &self,
        identity: &Identity,
        order_id: &str,
        status: &str,
    ) -> Result<Order, ApiError> {
        let vendor = self.resolve_vendor(identity).await?;
        let status = OrderStatus::from_str(status)?;
        let order_id = parse_object_id(order_id, "Order not found")?;
        self.db
            .update_order_status_scoped(&order_id, &vendor.id.ok_or_else(missing_vendor_id)?, status)
            .await
    }

    /// Joins customer names/emails and product names onto raw orders for
    /// the vendor dashboard.
    async fn populate_orders(&self, orders: Vec<Order>) -> Result<Vec<VendorOrderView>, ApiError> {
        let customer_ids: Vec<ObjectId> = orders.iter().map(|o| o.customer).collect();
        let product_ids: Vec<ObjectId> = orders
            .iter()
            .flat_map(|o| o.items.iter().map(|i| i.product))
            .collect();

        let customers: HashMap<ObjectId, _> = self
            .db
            .find_users_by_ids(&customer_ids)
            .await?
            .into_iter()
            .filter_map(|u| u.id.map(|id| (id, u)))
            .collect();
        let products: HashMap<ObjectId, _> = self
            .db
            .find_products_by_ids(&product_ids)
            .await?
            .into_iter()
            .filter_map(|p| p.id.map(|id| (id, p)))
            .collect();

        Ok(orders
            .into_iter()
            .map(|order| {
                let (customer_name, customer_email) = customers
                    .get(&order.customer)
                    .map(|u| (u.name.clone(), u.email.clone()))
                    .unwrap_or_default();
                let items = order
                    .items
                    .iter()
                    .map(|item| OrderItemView {
                        product_id: item.product.to_hex(),
                        product_name: products
                            .get(&item.product)
                            .map(|p| p.name.clone())
                            .unwrap_or_default(),
                        quantity: item.quantity,
                        unit_price: item.unit_price,
                    })
                    .collect();
                VendorOrderView {
                    id: order.id.map(|id| id.to_hex()).unwrap_or_default(),
                    customer_name,
                    customer_email,
                    items,
                    status: order.status,
                    total: order.total,
                    created_at: order.created_at,
                }
            })
            .collect())
    }
}

fn missing_vendor_id() -> ApiError {
    ApiError::InternalError("Vendor record has no id".to_string())
}

/// Malformed ids behave like absent records, matching the
/// absent-vs-not-yours conflation.
fn parse_object_id(raw: &str, not_found: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::NotFound(not_found.to_string()))
}

/// Shared by profile create and partial update: fields that are present
/// must be non-empty.
fn validate_profile_fields(
    store_name: Option<&str>,
    address: Option<&str>,
) -> Result<(), ApiError> {
    if let Some(store_name) = store_name {
        if store_name.trim().is_empty() {
            return Err(ApiError::ValidationError(
                "storeName cannot be empty".to_string(),
            ));
        }
    }
    if let Some(address) = address {
        if address.trim().is_empty() {
            return Err(ApiError::ValidationError(
                "address cannot be empty".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_product_fields(
    name: Option<&str>,
    description: Option<&str>,
    price: Option<f64>,
    category: Option<&str>,
    discount: Option<f64>,
) -> Result<(), ApiError> {
    if let Some(name) = name {
        if name.trim().is_empty() {
            return Err(ApiError::ValidationError("name cannot be empty".to_string()));
        }
    }
    if let Some(description) = description {
        if description.trim().is_empty() {
            return Err(ApiError::ValidationError(
                "description cannot be empty".to_string(),
            ));
        }
    }
    if let Some(price) = price {
        if !price.is_finite() || price < 0.0 {
            return Err(ApiError::ValidationError(
                "price must be a number >= 0".to_string(),
            ));
        }
    }
    if let Some(category) = category {
        if category.trim().is_empty() {
            return Err(ApiError::ValidationError(
                "category cannot be empty".to_string(),
            ));
        }
    }
    if let Some(discount) = discount {
        if !discount.is_finite() || !(0.0..=100.0).contains(&discount) {
            return Err(ApiError::ValidationError(
                "discount must be between 0 and 100".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_price_is_rejected() {
        let err = validate_product_fields(Some("Rice"), Some("Long grain"), Some(-1.0), Some("grains"), None);
        assert!(matches!(err, Err(ApiError::ValidationError(_))));
    }

    #[test]
    fn discount_must_stay_within_bounds() {
        assert!(validate_product_fields(None, None, None, None, Some(0.0)).is_ok());
        assert!(validate_product_fields(None, None, None, None, Some(100.0)).is_ok());
        assert!(matches!(
            validate_product_fields(None, None, None, None, Some(100.5)),
            Err(ApiError::ValidationError(_))
        ));
        assert!(matches!(
            validate_product_fields(None, None, None, None, Some(-0.1)),
            Err(ApiError::ValidationError(_))
        ));
    }

    #[test]
    fn empty_category_is_rejected() {
        assert!(matches!(
            validate_product_fields(None, None, None, Some("  "), None),
            Err(ApiError::ValidationError(_))
        ));
    }

    #[test]
    fn partial_update_with_no_fields_is_valid() {
        assert!(validate_product_fields(None, None, None, None, None).is_ok());
    }

    #[test]
    fn profile_update_rejects_empty_strings() {
        assert!(validate_profile_fields(None, None).is_ok());
        assert!(validate_profile_fields(Some("Ada Stores"), Some("12 Lagos Rd")).is_ok());
        assert!(matches!(
            validate_profile_fields(Some("  "), None),
            Err(ApiError::ValidationError(_))
        ));
        assert!(matches!(
            validate_profile_fields(None, Some("")),
            Err(ApiError::ValidationError(_))
        ));
    }

    #[test]
    fn malformed_id_reads_as_not_found() {
        match parse_object_id("definitely-not-an-oid", "Product not found") {
            Err(ApiError::NotFound(msg)) => assert_eq!(msg, "Product not found"),
            other => panic!("expected NotFound, got ok={}", other.is_ok()),
        }
    }
}

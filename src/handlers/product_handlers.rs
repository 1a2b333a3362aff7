use actix_web::{web, HttpResponse};
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;

use crate::middleware::Identity;
use crate::models::{ApiError, ProductListing};
use crate::services::MongoDBService;

/// Public catalog: all available products with the owning vendor's store
/// name joined in.
pub async fn list_catalog(
    _identity: Identity,
    db: web::Data<MongoDBService>,
) -> Result<HttpResponse, ApiError> {
    let products = db.all_available_products().await?;

    let vendor_ids: Vec<ObjectId> = products.iter().map(|p| p.vendor).collect();
    let store_names: HashMap<ObjectId, String> = db
        .find_vendors_by_ids(&vendor_ids)
        .await?
        .into_iter()
        .filter_map(|v| v.id.map(|id| (id, v.store_name)))
        .collect();

    let listings: Vec<ProductListing> = products
        .into_iter()
        .map(|product| {
            let store_name = store_names.get(&product.vendor).cloned().unwrap_or_default();
            ProductListing {
                product,
                store_name,
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(listings))
}

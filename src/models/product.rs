use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

fn default_available() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub vendor: ObjectId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    /// Percent off, 0-100.
    #[serde(default)]
    pub discount: f64,
    pub stock: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub discount: Option<f64>,
    pub stock: i64,
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub discount: Option<f64>,
    pub stock: Option<i64>,
    pub image: Option<String>,
    pub is_available: Option<bool>,
}

/// Catalog entry: a product joined with its vendor's display name.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    #[serde(flatten)]
    pub product: Product,
    pub store_name: String,
}

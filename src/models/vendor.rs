use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DELIVERY_PRICING_PER_KM: f64 = 50.0;

fn default_delivery_pricing() -> f64 {
    DEFAULT_DELIVERY_PRICING_PER_KM
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Owning user, exactly one vendor document per vendor-role user.
    pub user: ObjectId,
    pub store_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub address: String,
    #[serde(default = "default_delivery_pricing")]
    pub delivery_pricing_per_km: f64,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub rating: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Vendor {
    pub fn new(
        user: ObjectId,
        store_name: String,
        address: String,
        delivery_pricing_per_km: Option<f64>,
    ) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: None,
            user,
            store_name,
            description: String::new(),
            logo: None,
            phone: None,
            address,
            delivery_pricing_per_km: delivery_pricing_per_km
                .unwrap_or(DEFAULT_DELIVERY_PRICING_PER_KM),
            is_approved: false,
            rating: 0.0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorProfileRequest {
    pub store_name: String,
    pub address: String,
    pub delivery_pricing_per_km: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVendorProfileRequest {
    pub store_name: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub delivery_pricing_per_km: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_rate_defaults_when_omitted() {
        let vendor = Vendor::new(ObjectId::new(), "Ada Stores".into(), "12 Lagos Rd".into(), None);
        assert_eq!(vendor.delivery_pricing_per_km, DEFAULT_DELIVERY_PRICING_PER_KM);
        assert!(!vendor.is_approved);
        assert_eq!(vendor.rating, 0.0);
    }

    #[test]
    fn explicit_delivery_rate_is_kept() {
        let vendor =
            Vendor::new(ObjectId::new(), "Ada Stores".into(), "12 Lagos Rd".into(), Some(75.0));
        assert_eq!(vendor.delivery_pricing_per_km, 75.0);
    }
}

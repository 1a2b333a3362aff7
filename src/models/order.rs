use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::ApiError;

/// Closed order lifecycle enumeration. Any status may transition to any
/// other; only membership is enforced.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    Accepted,
    InTransit,
    Delivered,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::InTransit => "in-transit",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for OrderStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "accepted" => Ok(OrderStatus::Accepted),
            "in-transit" => Ok(OrderStatus::InTransit),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(ApiError::InvalidStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product: ObjectId,
    pub quantity: u32,
    /// Price snapshot at checkout, discount already applied.
    pub unit_price: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub customer: ObjectId,
    pub vendor: ObjectId,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub total: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    /// Kept as a raw string so membership is checked explicitly and a bad
    /// value surfaces as InvalidStatus, not a deserialize failure.
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

/// An order as shown on the vendor dashboard, customer and product names
/// populated.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorOrderView {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<OrderItemView>,
    pub status: OrderStatus,
    pub total: f64,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_statuses_parse_from_wire_strings() {
        for (s, expected) in [
            ("pending", OrderStatus::Pending),
            ("accepted", OrderStatus::Accepted),
            ("in-transit", OrderStatus::InTransit),
            ("delivered", OrderStatus::Delivered),
            ("cancelled", OrderStatus::Cancelled),
        ] {
            assert_eq!(s.parse::<OrderStatus>().unwrap(), expected);
            assert_eq!(expected.to_string(), s);
        }
    }

    #[test]
    fn unknown_status_yields_invalid_status() {
        for bad in ["shipped", "Pending", "in_transit", ""] {
            match bad.parse::<OrderStatus>() {
                Err(ApiError::InvalidStatus(s)) => assert_eq!(s, bad),
                other => panic!("expected InvalidStatus for {:?}, got {:?}", bad, other.is_ok()),
            }
        }
    }

    #[test]
    fn status_serde_matches_display() {
        let json = serde_json::to_string(&OrderStatus::InTransit).unwrap();
        assert_eq!(json, "\"in-transit\"");
        let back: OrderStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OrderStatus::InTransit);
    }
}

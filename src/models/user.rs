use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::vendor::Vendor;

/// Closed account-role enumeration. Wire and storage form is lowercase
/// ("customer" / "vendor").
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Vendor,
}

fn default_role() -> Role {
    Role::Customer
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string. Never returned to clients; see UserResponse.
    pub password_hash: String,
    #[serde(default = "default_role")]
    pub role: Role,
    pub created_at: i64,
}

/// Public projection of a User. The password hash stays server-side.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user
                .id
                .map(|id| id.to_hex())
                .unwrap_or_default(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    // Only read when role = vendor
    pub store_name: Option<String>,
    pub store_address: Option<String>,
    pub delivery_pricing_per_km: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterVendorRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub business_name: String,
    pub phone: Option<String>,
    pub store_address: String,
    pub delivery_pricing_per_km: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct VendorAuthResponse {
    pub token: String,
    pub user: UserResponse,
    pub vendor: Vendor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_as_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Customer).unwrap(), "\"customer\"");
        assert_eq!(serde_json::to_string(&Role::Vendor).unwrap(), "\"vendor\"");
        let role: Role = serde_json::from_str("\"vendor\"").unwrap();
        assert_eq!(role, Role::Vendor);
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
    }

    #[test]
    fn user_response_omits_password_hash() {
        let user = User {
            id: Some(ObjectId::new()),
            name: "Ada".to_string(),
            email: "ada@x.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: Role::Vendor,
            created_at: 0,
        };
        let body = serde_json::to_value(UserResponse::from(&user)).unwrap();
        assert!(body.get("password_hash").is_none());
        assert!(body.get("passwordHash").is_none());
        assert_eq!(body["email"], "ada@x.com");
    }
}

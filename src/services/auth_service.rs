use actix_web::web;
use log::{error, info};
use mongodb::bson::oid::ObjectId;

use crate::models::{
    ApiError, AuthResponse, LoginRequest, RegisterRequest, RegisterVendorRequest, Role, User,
    UserResponse, Vendor, VendorAuthResponse,
};
use crate::services::{MongoDBService, TokenService};
use crate::utils::password;

#[derive(Clone)]
pub struct AuthService {
    db: web::Data<MongoDBService>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(db: web::Data<MongoDBService>, tokens: TokenService) -> Self {
        Self { db, tokens }
    }

    /// Registers a customer or vendor account. Vendor registration performs
    /// two writes (User, then Vendor); if the second fails the first is
    /// compensated with a delete so no orphaned vendor-role user remains.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, ApiError> {
        validate_registration(&request.name, &request.email, &request.password)?;

        let user = match request.role {
            Role::Customer => {
                self.create_user(&request.name, &request.email, &request.password, Role::Customer)
                    .await?
            }
            Role::Vendor => {
                let store_name = request
                    .store_name
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| {
                        ApiError::ValidationError("storeName is required for vendors".to_string())
                    })?;
                let store_address = request
                    .store_address
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| {
                        ApiError::ValidationError("storeAddress is required for vendors".to_string())
                    })?;

                let (user, _vendor) = self
                    .create_user_and_vendor(
                        &request.name,
                        &request.email,
                        &request.password,
                        store_name,
                        store_address,
                        request.delivery_pricing_per_km,
                        None,
                    )
                    .await?;
                user
            }
        };

        let token = self.tokens.issue(&user)?;
        Ok(AuthResponse {
            token,
            user: UserResponse::from(&user),
        })
    }

    /// Vendor registration with the explicit store fields.
    pub async fn register_vendor(
        &self,
        request: RegisterVendorRequest,
    ) -> Result<VendorAuthResponse, ApiError> {
        validate_registration(&request.name, &request.email, &request.password)?;
        if request.business_name.trim().is_empty() {
            return Err(ApiError::ValidationError(
                "businessName cannot be empty".to_string(),
            ));
        }
        if request.store_address.trim().is_empty() {
            return Err(ApiError::ValidationError(
                "storeAddress cannot be empty".to_string(),
            ));
        }

        let (user, vendor) = self
            .create_user_and_vendor(
                &request.name,
                &request.email,
                &request.password,
                request.business_name,
                request.store_address,
                request.delivery_pricing_per_km,
                request.phone,
            )
            .await?;

        let token = self.tokens.issue(&user)?;
        Ok(VendorAuthResponse {
            token,
            user: UserResponse::from(&user),
            vendor,
        })
    }

    /// Authenticates by email and password. Unknown email and wrong password
    /// return the same generic error.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ApiError> {
        let user = self
            .db
            .find_user_by_email(&request.email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        if !password::verify_password(&user.password_hash, &request.password) {
            return Err(ApiError::InvalidCredentials);
        }

        info!("User {} logged in", user.email);
        let token = self.tokens.issue(&user)?;
        Ok(AuthResponse {
            token,
            user: UserResponse::from(&user),
        })
    }

    async fn create_user(
        &self,
        name: &str,
        email: &str,
        plain_password: &str,
        role: Role,
    ) -> Result<User, ApiError> {
        if self.db.find_user_by_email(email).await?.is_some() {
            return Err(ApiError::DuplicateEmail(email.to_string()));
        }

        let user = User {
            id: Some(ObjectId::new()),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password::hash_password(plain_password)?,
            role,
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        self.db.insert_user(user).await
    }

    #[allow(clippy::too_many_arguments)]
    async fn create_user_and_vendor(
        &self,
        name: &str,
        email: &str,
        plain_password: &str,
        store_name: String,
        store_address: String,
        delivery_pricing_per_km: Option<f64>,
        phone: Option<String>,
    ) -> Result<(User, Vendor), ApiError> {
        let user = self
            .create_user(name, email, plain_password, Role::Vendor)
            .await?;
        let user_id = user
            .id
            .ok_or_else(|| ApiError::InternalError("Inserted user has no id".to_string()))?;

        let mut vendor = Vendor::new(user_id, store_name, store_address, delivery_pricing_per_km);
        vendor.phone = phone;
        match self.db.insert_vendor(vendor).await {
            Ok(vendor) => Ok((user, vendor)),
            Err(e) => {
                // Compensating delete so the email is not left claimed by an
                // account that can never act as a vendor
                error!("Vendor insert failed for {}, rolling back user: {}", email, e);
                if let Err(cleanup) = self.db.delete_user(&user_id).await {
                    error!("Compensating user delete also failed for {}: {}", email, cleanup);
                }
                Err(e)
            }
        }
    }
}

fn validate_registration(name: &str, email: &str, password: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::ValidationError("name cannot be empty".to_string()));
    }
    if email.trim().is_empty() || !email.contains('@') {
        return Err(ApiError::ValidationError(
            "a valid email is required".to_string(),
        ));
    }
    if password.is_empty() {
        return Err(ApiError::ValidationError(
            "password cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_fields_are_required() {
        assert!(validate_registration("Ada", "ada@x.com", "secret1").is_ok());
        assert!(matches!(
            validate_registration("", "ada@x.com", "secret1"),
            Err(ApiError::ValidationError(_))
        ));
        assert!(matches!(
            validate_registration("Ada", "not-an-email", "secret1"),
            Err(ApiError::ValidationError(_))
        ));
        assert!(matches!(
            validate_registration("Ada", "ada@x.com", ""),
            Err(ApiError::ValidationError(_))
        ));
    }
}

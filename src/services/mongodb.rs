use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId};
use mongodb::options::{
    ClientOptions, FindOneAndUpdateOptions, IndexOptions, ReturnDocument, ServerApi,
    ServerApiVersion, UpdateOptions,
};
use mongodb::{Client, Collection, IndexModel};
use std::env;

use crate::models::{
    ApiError, Cart, Order, OrderStatus, Product, UpdateProductRequest, UpdateVendorProfileRequest,
    User, Vendor,
};

#[derive(Clone)]
pub struct MongoDBService {
    users: Collection<User>,
    vendors: Collection<Vendor>,
    products: Collection<Product>,
    orders: Collection<Order>,
    carts: Collection<Cart>,
}

impl MongoDBService {
    pub async fn init() -> Result<Self, mongodb::error::Error> {
        let uri = env::var("MONGODB_URI").expect("MONGODB_URI must be set");

        let mut client_options = ClientOptions::parse(&uri).await?;

        let server_api = ServerApi::builder()
            .version(ServerApiVersion::V1)
            .strict(true)
            .deprecation_errors(true)
            .build();
        client_options.server_api = Some(server_api);

        client_options.connect_timeout = Some(std::time::Duration::from_secs(10));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Test connection
        client
            .database("admin")
            .run_command(doc! {"ping": 1}, None)
            .await?;

        log::info!("Successfully connected to MongoDB");

        let db = client.database("sabi_market");
        let users = db.collection::<User>("users");
        let vendors = db.collection::<Vendor>("vendors");
        let products = db.collection::<Product>("products");
        let orders = db.collection::<Order>("orders");
        let carts = db.collection::<Cart>("carts");

        // Unique index on email, the registration invariant
        let options = IndexOptions::builder().unique(true).build();
        let email_model = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(options)
            .build();
        users.create_index(email_model, None).await?;

        // One vendor document per user
        let vendor_options = IndexOptions::builder().unique(true).build();
        let vendor_model = IndexModel::builder()
            .keys(doc! { "user": 1 })
            .options(vendor_options)
            .build();
        vendors.create_index(vendor_model, None).await?;

        // One cart document per user
        let cart_options = IndexOptions::builder().unique(true).build();
        let cart_model = IndexModel::builder()
            .keys(doc! { "user": 1 })
            .options(cart_options)
            .build();
        carts.create_index(cart_model, None).await?;

        // Vendor-scoped listings
        let product_vendor_model = IndexModel::builder()
            .keys(doc! { "vendor": 1 })
            .build();
        products.create_index(product_vendor_model, None).await?;

        let order_vendor_model = IndexModel::builder()
            .keys(doc! { "vendor": 1, "createdAt": -1 })
            .build();
        orders.create_index(order_vendor_model, None).await?;

        Ok(Self {
            users,
            vendors,
            products,
            orders,
            carts,
        })
    }

    // ---- users ----

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        self.users
            .find_one(doc! { "email": email }, None)
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn find_users_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<User>, ApiError> {
        self.users
            .find(doc! { "_id": { "$in": ids } }, None)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn insert_user(&self, user: User) -> Result<User, ApiError> {
        match self.users.insert_one(user.clone(), None).await {
            Ok(_) => Ok(user),
            // Two registrations can race past the find-one check; the
            // unique email index is the arbiter
            Err(e) if is_duplicate_key_message(&e.to_string()) => {
                Err(ApiError::DuplicateEmail(user.email))
            }
            Err(e) => Err(ApiError::DatabaseError(e)),
        }
    }

    /// Compensation for the two-step vendor registration: removes the user
    /// record created just before a failed vendor insert.
    pub async fn delete_user(&self, user_id: &ObjectId) -> Result<(), ApiError> {
        self.users
            .delete_one(doc! { "_id": user_id }, None)
            .await
            .map_err(ApiError::DatabaseError)?;
        Ok(())
    }

    // ---- vendors ----

    pub async fn insert_vendor(&self, vendor: Vendor) -> Result<Vendor, ApiError> {
        let result = self
            .vendors
            .insert_one(vendor.clone(), None)
            .await
            .map_err(ApiError::DatabaseError)?;
        Ok(Vendor {
            id: result.inserted_id.as_object_id(),
            ..vendor
        })
    }

    pub async fn find_vendor_by_user(&self, user_id: &ObjectId) -> Result<Option<Vendor>, ApiError> {
        self.vendors
            .find_one(doc! { "user": user_id }, None)
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn find_vendors_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Vendor>, ApiError> {
        self.vendors
            .find(doc! { "_id": { "$in": ids } }, None)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn update_vendor_profile(
        &self,
        user_id: &ObjectId,
        update: UpdateVendorProfileRequest,
    ) -> Result<Vendor, ApiError> {
        let mut update_doc = doc! {};
        if let Some(store_name) = update.store_name {
            update_doc.insert("storeName", store_name);
        }
        if let Some(description) = update.description {
            update_doc.insert("description", description);
        }
        if let Some(logo) = update.logo {
            update_doc.insert("logo", logo);
        }
        if let Some(phone) = update.phone {
            update_doc.insert("phone", phone);
        }
        if let Some(address) = update.address {
            update_doc.insert("address", address);
        }
        if let Some(rate) = update.delivery_pricing_per_km {
            update_doc.insert("deliveryPricingPerKm", rate);
        }
        update_doc.insert("updatedAt", chrono::Utc::now().timestamp_millis());

        self.vendors
            .find_one_and_update(
                doc! { "user": user_id },
                doc! { "$set": update_doc },
                Some(
                    FindOneAndUpdateOptions::builder()
                        .return_document(ReturnDocument::After)
                        .build(),
                ),
            )
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or(ApiError::VendorProfileNotFound)
    }

    // ---- products ----

    pub async fn insert_product(&self, product: Product) -> Result<Product, ApiError> {
        let result = self
            .products
            .insert_one(product.clone(), None)
            .await
            .map_err(ApiError::DatabaseError)?;
        Ok(Product {
            id: result.inserted_id.as_object_id(),
            ..product
        })
    }

    pub async fn products_by_vendor(&self, vendor_id: &ObjectId) -> Result<Vec<Product>, ApiError> {
        self.products
            .find(doc! { "vendor": vendor_id }, None)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn all_available_products(&self) -> Result<Vec<Product>, ApiError> {
        self.products
            .find(doc! { "isAvailable": true }, None)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn find_products_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Product>, ApiError> {
        self.products
            .find(doc! { "_id": { "$in": ids } }, None)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)
    }

    /// Partial update scoped by `{_id, vendor}`. A product that exists but
    /// belongs to another vendor is indistinguishable from an absent one.
    pub async fn update_product_scoped(
        &self,
        product_id: &ObjectId,
        vendor_id: &ObjectId,
        update: UpdateProductRequest,
    ) -> Result<Product, ApiError> {
        let mut update_doc = doc! {};
        if let Some(name) = update.name {
            update_doc.insert("name", name);
        }
        if let Some(description) = update.description {
            update_doc.insert("description", description);
        }
        if let Some(price) = update.price {
            update_doc.insert("price", price);
        }
        if let Some(category) = update.category {
            update_doc.insert("category", category);
        }
        if let Some(discount) = update.discount {
            update_doc.insert("discount", discount);
        }
        if let Some(stock) = update.stock {
            update_doc.insert("stock", stock);
        }
        if let Some(image) = update.image {
            update_doc.insert("image", image);
        }
        if let Some(is_available) = update.is_available {
            update_doc.insert("isAvailable", is_available);
        }
        update_doc.insert("updatedAt", chrono::Utc::now().timestamp_millis());

        self.products
            .find_one_and_update(
                doc! { "_id": product_id, "vendor": vendor_id },
                doc! { "$set": update_doc },
                Some(
                    FindOneAndUpdateOptions::builder()
                        .return_document(ReturnDocument::After)
                        .build(),
                ),
            )
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))
    }

    pub async fn delete_product_scoped(
        &self,
        product_id: &ObjectId,
        vendor_id: &ObjectId,
    ) -> Result<(), ApiError> {
        let result = self
            .products
            .delete_one(doc! { "_id": product_id, "vendor": vendor_id }, None)
            .await
            .map_err(ApiError::DatabaseError)?;
        if result.deleted_count == 0 {
            return Err(ApiError::NotFound("Product not found".to_string()));
        }
        Ok(())
    }

    // ---- orders ----

    pub async fn insert_order(&self, order: Order) -> Result<Order, ApiError> {
        let result = self
            .orders
            .insert_one(order.clone(), None)
            .await
            .map_err(ApiError::DatabaseError)?;
        Ok(Order {
            id: result.inserted_id.as_object_id(),
            ..order
        })
    }

    pub async fn orders_by_vendor(&self, vendor_id: &ObjectId) -> Result<Vec<Order>, ApiError> {
        let mut orders: Vec<Order> = self
            .orders
            .find(doc! { "vendor": vendor_id }, None)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    pub async fn orders_by_customer(&self, customer_id: &ObjectId) -> Result<Vec<Order>, ApiError> {
        let mut orders: Vec<Order> = self
            .orders
            .find(doc! { "customer": customer_id }, None)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Status update scoped by `{_id, vendor}`; the status value has already
    /// been validated against the enumeration by this point.
    pub async fn update_order_status_scoped(
        &self,
        order_id: &ObjectId,
        vendor_id: &ObjectId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let status_bson = bson::to_bson(&status)
            .map_err(|e| ApiError::InternalError(format!("Failed to serialize status: {}", e)))?;
        self.orders
            .find_one_and_update(
                doc! { "_id": order_id, "vendor": vendor_id },
                doc! { "$set": {
                    "status": status_bson,
                    "updatedAt": chrono::Utc::now().timestamp_millis()
                } },
                Some(
                    FindOneAndUpdateOptions::builder()
                        .return_document(ReturnDocument::After)
                        .build(),
                ),
            )
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))
    }

    // ---- carts ----

    pub async fn find_cart(&self, user_id: &ObjectId) -> Result<Cart, ApiError> {
        let cart = self
            .carts
            .find_one(doc! { "user": user_id }, None)
            .await
            .map_err(ApiError::DatabaseError)?;
        Ok(cart.unwrap_or_else(|| Cart::empty(*user_id)))
    }

    /// Persists the full item list for the user's cart, creating the
    /// document on first write. Last write wins, per the store's semantics.
    pub async fn save_cart(&self, cart: &Cart) -> Result<(), ApiError> {
        let items = bson::to_bson(&cart.items)
            .map_err(|e| ApiError::InternalError(format!("Failed to serialize cart: {}", e)))?;
        self.carts
            .update_one(
                doc! { "user": &cart.user },
                doc! { "$set": { "items": items, "updatedAt": cart.updated_at } },
                Some(UpdateOptions::builder().upsert(true).build()),
            )
            .await
            .map_err(ApiError::DatabaseError)?;
        Ok(())
    }

    pub async fn clear_cart(&self, user_id: &ObjectId) -> Result<(), ApiError> {
        self.carts
            .update_one(
                doc! { "user": user_id },
                doc! { "$set": {
                    "items": Vec::<bson::Bson>::new(),
                    "updatedAt": chrono::Utc::now().timestamp_millis()
                } },
                None,
            )
            .await
            .map_err(ApiError::DatabaseError)?;
        Ok(())
    }
}

fn is_duplicate_key_message(message: &str) -> bool {
    message.contains("E11000 duplicate key error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_index_violation_is_recognized() {
        let driver_message = "Kind: An error occurred when trying to execute a write operation: \
            WriteError { code: 11000, message: \"E11000 duplicate key error collection: \
            sabi_market.users index: email_1 dup key: { email: \\\"ada@x.com\\\" }\" }";
        assert!(is_duplicate_key_message(driver_message));
    }

    #[test]
    fn other_write_errors_are_not_treated_as_duplicates() {
        assert!(!is_duplicate_key_message("connection refused"));
        assert!(!is_duplicate_key_message(""));
    }
}

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: ObjectId,
    pub quantity: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user: ObjectId,
    pub items: Vec<CartItem>,
    pub updated_at: i64,
}

impl Cart {
    pub fn empty(user: ObjectId) -> Self {
        Self {
            id: None,
            user,
            items: Vec::new(),
            updated_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Sets the quantity for a product. Quantities below 1 remove the
    /// entry; quantities past u32::MAX clamp rather than truncate.
    pub fn set_item(&mut self, product: ObjectId, quantity: i64) {
        self.items.retain(|item| item.product != product);
        if quantity >= 1 {
            let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            self.items.push(CartItem { product, quantity });
        }
        self.updated_at = chrono::Utc::now().timestamp_millis();
    }

    /// Adds to an existing entry, or inserts one. Merged quantities
    /// saturate so an entry can never wrap back below 1.
    pub fn add_item(&mut self, product: ObjectId, quantity: u32) {
        match self.items.iter_mut().find(|item| item.product == product) {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => self.items.push(CartItem { product, quantity }),
        }
        self.updated_at = chrono::Utc::now().timestamp_millis();
    }

    pub fn remove_item(&mut self, product: &ObjectId) {
        self.items.retain(|item| &item.product != product);
        self.updated_at = chrono::Utc::now().timestamp_millis();
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct SetCartItemRequest {
    pub quantity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_item_merges_quantities() {
        let product = ObjectId::new();
        let mut cart = Cart::empty(ObjectId::new());
        cart.add_item(product, 2);
        cart.add_item(product, 3);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
    }

    #[test]
    fn set_item_below_one_removes_entry() {
        let product = ObjectId::new();
        let mut cart = Cart::empty(ObjectId::new());
        cart.add_item(product, 2);

        cart.set_item(product, 0);
        assert!(cart.items.is_empty());

        cart.add_item(product, 2);
        cart.set_item(product, -3);
        assert!(cart.items.is_empty());
    }

    #[test]
    fn set_item_overwrites_quantity() {
        let product = ObjectId::new();
        let mut cart = Cart::empty(ObjectId::new());
        cart.add_item(product, 2);
        cart.set_item(product, 7);
        assert_eq!(cart.items, vec![CartItem { product, quantity: 7 }]);
    }

    #[test]
    fn add_item_saturates_instead_of_wrapping() {
        let product = ObjectId::new();
        let mut cart = Cart::empty(ObjectId::new());
        cart.add_item(product, u32::MAX);
        cart.add_item(product, 1);
        assert_eq!(cart.items[0].quantity, u32::MAX);
    }

    #[test]
    fn oversized_set_item_clamps_instead_of_truncating() {
        let product = ObjectId::new();
        let mut cart = Cart::empty(ObjectId::new());
        cart.set_item(product, i64::from(u32::MAX) + 5);
        assert_eq!(cart.items[0].quantity, u32::MAX);
    }

    #[test]
    fn remove_item_only_touches_that_product() {
        let keep = ObjectId::new();
        let drop = ObjectId::new();
        let mut cart = Cart::empty(ObjectId::new());
        cart.add_item(keep, 1);
        cart.add_item(drop, 4);
        cart.remove_item(&drop);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].product, keep);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::catalog::Product;
use super::errors::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CartLineItem {
    pub product_id: String,
    pub quantity: i32,
}

/// A session's cart. Lines keep insertion order and never repeat a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    pub session_id: String,
    pub items: Vec<CartLineItem>,
    pub updated_at: DateTime<Utc>,
    /// Optimistic-concurrency counter, bumped by every successful write.
    #[serde(skip)]
    pub version: i64,
}

impl Cart {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            items: Vec::new(),
            updated_at: Utc::now(),
            version: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn quantity_of(&self, product_id: &str) -> Option<i32> {
        self.items
            .iter()
            .find(|i| i.product_id == product_id)
            .map(|i| i.quantity)
    }

    /// Add `quantity` units, merging into an existing line for the product.
    pub fn add(&mut self, product_id: &str, quantity: i32) -> Result<(), DomainError> {
        if quantity < 1 {
            return Err(DomainError::InvalidInput(
                "quantity must be at least 1".to_string(),
            ));
        }
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(line) => {
                line.quantity = line.quantity.checked_add(quantity).ok_or_else(|| {
                    DomainError::InvalidInput("quantity is too large".to_string())
                })?;
            }
            None => self.items.push(CartLineItem {
                product_id: product_id.to_string(),
                quantity,
            }),
        }
        self.touch();
        Ok(())
    }

    /// Replace a line's quantity. A non-positive quantity removes the line;
    /// a positive one requires the line to exist already.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i32) -> Result<(), DomainError> {
        if quantity <= 0 {
            self.remove(product_id);
            return Ok(());
        }
        let line = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or_else(|| DomainError::NotFound("Item not in cart".to_string()))?;
        line.quantity = quantity;
        self.touch();
        Ok(())
    }

    /// Drop the line for `product_id`; absent lines are a no-op.
    pub fn remove(&mut self, product_id: &str) {
        self.items.retain(|i| i.product_id != product_id);
        self.touch();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Cart as shown to the client: stored lines plus the products that still
/// resolve, in line order.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartView {
    pub session_id: String,
    pub items: Vec<CartLineItem>,
    pub products: Vec<Product>,
}

impl CartView {
    pub fn empty(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            items: Vec::new(),
            products: Vec::new(),
        }
    }

    /// Join `cart` against `catalog` (any order), skipping lines whose product is gone.
    pub fn join(cart: Cart, catalog: Vec<Product>) -> Self {
        let products = cart
            .items
            .iter()
            .filter_map(|line| catalog.iter().find(|p| p.id == line.product_id).cloned())
            .collect();
        Self {
            session_id: cart.session_id,
            items: cart.items,
            products,
        }
    }
}

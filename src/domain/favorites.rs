use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::catalog::Product;

#[derive(Debug, Clone, PartialEq)]
pub struct Favorites {
    pub session_id: String,
    /// Membership set; kept in insertion order for display.
    pub product_ids: Vec<String>,
    pub updated_at: DateTime<Utc>,
    pub version: i64,
}

impl Favorites {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            product_ids: Vec::new(),
            updated_at: Utc::now(),
            version: 0,
        }
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.product_ids.iter().any(|id| id == product_id)
    }

    /// Flip membership of `product_id`. Returns whether it is now a favorite.
    pub fn toggle(&mut self, product_id: &str) -> bool {
        let is_favorite = if self.contains(product_id) {
            self.product_ids.retain(|id| id != product_id);
            false
        } else {
            self.product_ids.push(product_id.to_string());
            true
        };
        self.updated_at = Utc::now();
        is_favorite
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FavoritesView {
    pub session_id: String,
    pub product_ids: Vec<String>,
    /// Catalog products for `product_ids`, in no particular order.
    pub products: Vec<Product>,
}

impl FavoritesView {
    pub fn empty(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            product_ids: Vec::new(),
            products: Vec::new(),
        }
    }
}

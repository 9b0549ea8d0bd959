use uuid::Uuid;

use super::cart::Cart;
use super::catalog::{Banner, Category, Product, ProductFilter};
use super::errors::DomainError;
use super::favorites::Favorites;
use super::order::Order;

/// Read-only access to categories, products and banners.
pub trait CatalogRepository: Send + Sync + 'static {
    fn find_product(&self, id: &str) -> Result<Option<Product>, DomainError>;
    /// Products for `ids`, in no particular order. Unknown ids are ignored.
    fn find_products(&self, ids: &[String]) -> Result<Vec<Product>, DomainError>;
    fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError>;
    fn find_category(&self, id: &str) -> Result<Option<Category>, DomainError>;
    fn list_categories(&self) -> Result<Vec<Category>, DomainError>;
    fn list_banners(&self) -> Result<Vec<Banner>, DomainError>;
}

/// Cart documents keyed by session id.
///
/// `save` is a compare-and-swap on the cart version: `None` inserts only when
/// no cart exists, `Some(v)` replaces only a cart still at version `v`. A lost
/// race yields `DomainError::Conflict`. On success the stored version is
/// `expected + 1` (or 1 for an insert).
pub trait CartRepository: Send + Sync + 'static {
    fn find_by_session(&self, session_id: &str) -> Result<Option<Cart>, DomainError>;
    fn save(&self, cart: &Cart, expected_version: Option<i64>) -> Result<(), DomainError>;
    /// Empty the cart unconditionally, creating it if needed.
    fn clear(&self, session_id: &str) -> Result<(), DomainError>;
}

/// Favorites documents keyed by session id, same versioning contract as carts.
pub trait FavoritesRepository: Send + Sync + 'static {
    fn find_by_session(&self, session_id: &str) -> Result<Option<Favorites>, DomainError>;
    fn save(&self, favorites: &Favorites, expected_version: Option<i64>)
        -> Result<(), DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Persist `order` and empty its session's cart atomically. Fails with
    /// `Conflict` if the cart is no longer at `cart_version`.
    fn place(&self, order: &Order, cart_version: i64) -> Result<(), DomainError>;
    /// Orders of a session, newest first, at most `limit`.
    fn list_by_session(&self, session_id: &str, limit: i64) -> Result<Vec<Order>, DomainError>;
    fn find_for_session(&self, session_id: &str, id: Uuid) -> Result<Option<Order>, DomainError>;
}

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::cart::Cart;
use crate::domain::catalog::{Banner, Category, Product, ProductFilter};
use crate::domain::errors::DomainError;
use crate::domain::favorites::Favorites;
use crate::domain::order::Order;
use crate::domain::ports::{
    CartRepository, CatalogRepository, FavoritesRepository, OrderRepository,
};

#[derive(Default)]
struct State {
    categories: Vec<Category>,
    products: Vec<Product>,
    banners: Vec<Banner>,
    carts: HashMap<String, Cart>,
    favorites: HashMap<String, Favorites>,
    /// Append-only, in placement order.
    orders: Vec<Order>,
}

/// Process-local store implementing every repository port behind one lock.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(categories: Vec<Category>, products: Vec<Product>, banners: Vec<Banner>) -> Self {
        Self {
            state: Mutex::new(State {
                categories,
                products,
                banners,
                ..State::default()
            }),
        }
    }

    /// Insert or replace a catalog product.
    pub fn put_product(&self, product: Product) -> Result<(), DomainError> {
        let mut state = self.lock()?;
        state.products.retain(|p| p.id != product.id);
        state.products.push(product);
        Ok(())
    }

    pub fn delete_product(&self, id: &str) -> Result<(), DomainError> {
        self.lock()?.products.retain(|p| p.id != id);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, DomainError> {
        self.state
            .lock()
            .map_err(|_| DomainError::Internal("in-memory store lock poisoned".to_string()))
    }
}

fn check_version(current: Option<i64>, expected: Option<i64>, what: &str) -> Result<i64, DomainError> {
    match (current, expected) {
        (None, None) => Ok(1),
        (Some(current), Some(expected)) if current == expected => Ok(current + 1),
        _ => Err(DomainError::Conflict(format!("{what} was modified concurrently"))),
    }
}

impl CatalogRepository for InMemoryStore {
    fn find_product(&self, id: &str) -> Result<Option<Product>, DomainError> {
        Ok(self.lock()?.products.iter().find(|p| p.id == id).cloned())
    }

    fn find_products(&self, ids: &[String]) -> Result<Vec<Product>, DomainError> {
        Ok(self
            .lock()?
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError> {
        let state = self.lock()?;
        let mut products: Vec<Product> = state
            .products
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        products.sort_by(|a, b| a.id.cmp(&b.id));
        let skip = usize::try_from(filter.skip).unwrap_or(0);
        let limit = usize::try_from(filter.limit).unwrap_or(0);
        Ok(products.into_iter().skip(skip).take(limit).collect())
    }

    fn find_category(&self, id: &str) -> Result<Option<Category>, DomainError> {
        Ok(self.lock()?.categories.iter().find(|c| c.id == id).cloned())
    }

    fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        let mut categories = self.lock()?.categories.clone();
        categories.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(categories)
    }

    fn list_banners(&self) -> Result<Vec<Banner>, DomainError> {
        let mut banners = self.lock()?.banners.clone();
        banners.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(banners)
    }
}

impl CartRepository for InMemoryStore {
    fn find_by_session(&self, session_id: &str) -> Result<Option<Cart>, DomainError> {
        Ok(self.lock()?.carts.get(session_id).cloned())
    }

    fn save(&self, cart: &Cart, expected_version: Option<i64>) -> Result<(), DomainError> {
        let mut state = self.lock()?;
        let current = state.carts.get(&cart.session_id).map(|c| c.version);
        let version = check_version(current, expected_version, "cart")?;
        let mut stored = cart.clone();
        stored.version = version;
        state.carts.insert(cart.session_id.clone(), stored);
        Ok(())
    }

    fn clear(&self, session_id: &str) -> Result<(), DomainError> {
        let mut state = self.lock()?;
        let cart = state
            .carts
            .entry(session_id.to_string())
            .or_insert_with(|| Cart::new(session_id));
        cart.items.clear();
        cart.updated_at = Utc::now();
        cart.version += 1;
        Ok(())
    }
}

impl FavoritesRepository for InMemoryStore {
    fn find_by_session(&self, session_id: &str) -> Result<Option<Favorites>, DomainError> {
        Ok(self.lock()?.favorites.get(session_id).cloned())
    }

    fn save(&self, favorites: &Favorites, expected_version: Option<i64>) -> Result<(), DomainError> {
        let mut state = self.lock()?;
        let current = state.favorites.get(&favorites.session_id).map(|f| f.version);
        let version = check_version(current, expected_version, "favorites")?;
        let mut stored = favorites.clone();
        stored.version = version;
        state.favorites.insert(favorites.session_id.clone(), stored);
        Ok(())
    }
}

impl OrderRepository for InMemoryStore {
    fn place(&self, order: &Order, cart_version: i64) -> Result<(), DomainError> {
        let mut state = self.lock()?;
        let cart = state
            .carts
            .get_mut(&order.session_id)
            .filter(|c| c.version == cart_version)
            .ok_or_else(|| DomainError::Conflict("cart was modified concurrently".to_string()))?;
        cart.items.clear();
        cart.updated_at = Utc::now();
        cart.version += 1;
        state.orders.push(order.clone());
        Ok(())
    }

    fn list_by_session(&self, session_id: &str, limit: i64) -> Result<Vec<Order>, DomainError> {
        let state = self.lock()?;
        // Walk newest placements first so equal timestamps keep that order.
        let mut orders: Vec<Order> = state
            .orders
            .iter()
            .rev()
            .filter(|o| o.session_id == session_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(orders)
    }

    fn find_for_session(&self, session_id: &str, id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self
            .lock()?
            .orders
            .iter()
            .find(|o| o.id == id && o.session_id == session_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_save_enforces_version() {
        let store = InMemoryStore::new();
        let cart = Cart::new("s1");

        CartRepository::save(&store, &cart, None).unwrap();
        let stored = CartRepository::find_by_session(&store, "s1").unwrap().unwrap();
        assert_eq!(stored.version, 1);

        // A second "insert" loses the race.
        assert!(CartRepository::save(&store, &cart, None).unwrap_err().is_conflict());
        // So does a write based on a stale version.
        assert!(CartRepository::save(&store, &cart, Some(0)).unwrap_err().is_conflict());

        CartRepository::save(&store, &stored, Some(1)).unwrap();
        let stored = CartRepository::find_by_session(&store, "s1").unwrap().unwrap();
        assert_eq!(stored.version, 2);
    }

    #[test]
    fn clear_creates_missing_cart() {
        let store = InMemoryStore::new();
        store.clear("fresh").unwrap();
        let cart = CartRepository::find_by_session(&store, "fresh").unwrap().unwrap();
        assert!(cart.items.is_empty());
    }
}

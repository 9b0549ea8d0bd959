use std::sync::Arc;

use crate::domain::cart::{Cart, CartView};
use crate::domain::errors::DomainError;
use crate::domain::ports::{CartRepository, CatalogRepository};

use super::{require_id, retry_on_conflict};

pub struct CartService {
    carts: Arc<dyn CartRepository>,
    catalog: Arc<dyn CatalogRepository>,
}

impl CartService {
    pub fn new(carts: Arc<dyn CartRepository>, catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { carts, catalog }
    }

    /// The session's cart joined with current product details. A session
    /// without a cart gets an empty view.
    pub fn get_cart(&self, session_id: &str) -> Result<CartView, DomainError> {
        let Some(cart) = self.carts.find_by_session(session_id)? else {
            return Ok(CartView::empty(session_id));
        };
        let ids: Vec<String> = cart.items.iter().map(|i| i.product_id.clone()).collect();
        let products = if ids.is_empty() {
            Vec::new()
        } else {
            self.catalog.find_products(&ids)?
        };
        Ok(CartView::join(cart, products))
    }

    /// Add `quantity` of a catalog product, creating the cart on first use.
    pub fn add_item(
        &self,
        session_id: &str,
        product_id: &str,
        quantity: i32,
    ) -> Result<Cart, DomainError> {
        require_id(session_id, "session_id")?;
        require_id(product_id, "product_id")?;
        if self.catalog.find_product(product_id)?.is_none() {
            return Err(DomainError::not_found("Product"));
        }

        retry_on_conflict("add to cart", || {
            let (mut cart, expected) = match self.carts.find_by_session(session_id)? {
                Some(cart) => {
                    let version = cart.version;
                    (cart, Some(version))
                }
                None => (Cart::new(session_id), None),
            };
            cart.add(product_id, quantity)?;
            self.carts.save(&cart, expected)?;
            cart.version = expected.map_or(1, |v| v + 1);
            Ok(cart)
        })
    }

    /// Replace a line's quantity; `quantity <= 0` removes the line.
    pub fn update_item(
        &self,
        session_id: &str,
        product_id: &str,
        quantity: i32,
    ) -> Result<Cart, DomainError> {
        retry_on_conflict("update cart", || {
            let mut cart = self.existing_cart(session_id)?;
            let expected = cart.version;
            cart.set_quantity(product_id, quantity)?;
            self.carts.save(&cart, Some(expected))?;
            cart.version = expected + 1;
            Ok(cart)
        })
    }

    pub fn remove_item(&self, session_id: &str, product_id: &str) -> Result<(), DomainError> {
        retry_on_conflict("remove from cart", || {
            let mut cart = self.existing_cart(session_id)?;
            let expected = cart.version;
            cart.remove(product_id);
            self.carts.save(&cart, Some(expected))
        })
    }

    pub fn clear_cart(&self, session_id: &str) -> Result<(), DomainError> {
        self.carts.clear(session_id)?;
        log::info!("Cleared cart for session {session_id}");
        Ok(())
    }

    fn existing_cart(&self, session_id: &str) -> Result<Cart, DomainError> {
        self.carts
            .find_by_session(session_id)?
            .ok_or_else(|| DomainError::not_found("Cart"))
    }
}

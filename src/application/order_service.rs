use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderRequest, PricedLines};
use crate::domain::ports::{CartRepository, CatalogRepository, OrderRepository};

use super::{require_id, retry_on_conflict};

/// Upper bound on orders returned for one session.
pub const ORDER_HISTORY_LIMIT: i64 = 100;

pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    carts: Arc<dyn CartRepository>,
    catalog: Arc<dyn CatalogRepository>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        carts: Arc<dyn CartRepository>,
        catalog: Arc<dyn CatalogRepository>,
    ) -> Self {
        Self {
            orders,
            carts,
            catalog,
        }
    }

    /// Snapshot the session's cart into a new order and empty the cart.
    ///
    /// The order insert and the cart reset commit together; if the cart
    /// changes between reading and placing, the whole checkout is redone
    /// against the fresh cart.
    pub fn create_order(&self, request: OrderRequest) -> Result<Order, DomainError> {
        require_id(&request.session_id, "session_id")?;

        let order = retry_on_conflict("place order", || {
            let cart = self
                .carts
                .find_by_session(&request.session_id)?
                .filter(|c| !c.is_empty())
                .ok_or_else(|| DomainError::InvalidState("Cart is empty".to_string()))?;

            let ids: Vec<String> = cart.items.iter().map(|i| i.product_id.clone()).collect();
            let products = self.catalog.find_products(&ids)?;
            let priced = PricedLines::price(&cart.items, &products);
            if priced.items.len() < cart.items.len() {
                log::warn!(
                    "Session {}: {} cart line(s) reference products no longer in the catalog",
                    request.session_id,
                    cart.items.len() - priced.items.len()
                );
            }

            let order = Order::place(request.clone(), priced);
            self.orders.place(&order, cart.version)?;
            Ok(order)
        })?;

        log::info!(
            "Placed order {} for session {} (total {})",
            order.id,
            order.session_id,
            order.total
        );
        Ok(order)
    }

    pub fn list_orders(&self, session_id: &str) -> Result<Vec<Order>, DomainError> {
        self.orders.list_by_session(session_id, ORDER_HISTORY_LIMIT)
    }

    /// An order is only visible under the session that placed it.
    pub fn get_order(&self, session_id: &str, order_id: &str) -> Result<Order, DomainError> {
        let not_found = || DomainError::not_found("Order");
        let id = Uuid::parse_str(order_id).map_err(|_| not_found())?;
        self.orders
            .find_for_session(session_id, id)?
            .ok_or_else(not_found)
    }
}

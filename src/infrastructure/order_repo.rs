use chrono::Utc;
use diesel::prelude::*;
use serde_json::json;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::Order;
use crate::domain::ports::OrderRepository;
use crate::schema::{carts, orders};

use super::models::OrderRow;

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn place(&self, order: &Order, cart_version: i64) -> Result<(), DomainError> {
        let row = OrderRow::try_from(order)?;
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Empty the cart, but only the cart the order was priced from.
            let cleared = diesel::update(
                carts::table
                    .filter(carts::session_id.eq(&order.session_id))
                    .filter(carts::version.eq(cart_version)),
            )
            .set((
                carts::items.eq(json!([])),
                carts::updated_at.eq(Utc::now()),
                carts::version.eq(cart_version + 1),
            ))
            .execute(conn)?;
            if cleared == 0 {
                return Err(DomainError::Conflict(
                    "cart changed while the order was being placed".to_string(),
                ));
            }

            // 2. Record the order in the same transaction.
            diesel::insert_into(orders::table)
                .values(&row)
                .execute(conn)?;

            Ok(())
        })
    }

    fn list_by_session(&self, session_id: &str, limit: i64) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = orders::table
            .filter(orders::session_id.eq(session_id))
            .select(OrderRow::as_select())
            .order(orders::created_at.desc())
            .limit(limit)
            .load(&mut conn)?;
        rows.into_iter().map(Order::try_from).collect()
    }

    fn find_for_session(&self, session_id: &str, id: Uuid) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = orders::table
            .filter(orders::id.eq(id))
            .filter(orders::session_id.eq(session_id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(Order::try_from).transpose()
    }
}

use chrono::Utc;
use diesel::prelude::*;
use serde_json::json;

use crate::db::DbPool;
use crate::domain::cart::Cart;
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;
use crate::schema::carts;

use super::models::CartRow;

pub struct DieselCartRepository {
    pool: DbPool,
}

impl DieselCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn lost_race() -> DomainError {
    DomainError::Conflict("cart was modified concurrently".to_string())
}

impl CartRepository for DieselCartRepository {
    fn find_by_session(&self, session_id: &str) -> Result<Option<Cart>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = carts::table
            .filter(carts::session_id.eq(session_id))
            .select(CartRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(Cart::try_from).transpose()
    }

    fn save(&self, cart: &Cart, expected_version: Option<i64>) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let written = match expected_version {
            None => diesel::insert_into(carts::table)
                .values(&CartRow::from_cart(cart, 1)?)
                .on_conflict_do_nothing()
                .execute(&mut conn)?,
            Some(version) => {
                let row = CartRow::from_cart(cart, version + 1)?;
                diesel::update(
                    carts::table
                        .filter(carts::session_id.eq(&cart.session_id))
                        .filter(carts::version.eq(version)),
                )
                .set((
                    carts::items.eq(row.items),
                    carts::updated_at.eq(row.updated_at),
                    carts::version.eq(row.version),
                ))
                .execute(&mut conn)?
            }
        };

        if written == 0 {
            return Err(lost_race());
        }
        Ok(())
    }

    fn clear(&self, session_id: &str) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let now = Utc::now();
        diesel::insert_into(carts::table)
            .values(&CartRow {
                session_id: session_id.to_string(),
                items: json!([]),
                version: 1,
                updated_at: now,
            })
            .on_conflict(carts::session_id)
            .do_update()
            .set((
                carts::items.eq(json!([])),
                carts::updated_at.eq(now),
                carts::version.eq(carts::version + 1),
            ))
            .execute(&mut conn)?;
        Ok(())
    }
}

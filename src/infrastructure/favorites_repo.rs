use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::favorites::Favorites;
use crate::domain::ports::FavoritesRepository;
use crate::schema::favorites;

use super::models::FavoritesRow;

pub struct DieselFavoritesRepository {
    pool: DbPool,
}

impl DieselFavoritesRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl FavoritesRepository for DieselFavoritesRepository {
    fn find_by_session(&self, session_id: &str) -> Result<Option<Favorites>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = favorites::table
            .filter(favorites::session_id.eq(session_id))
            .select(FavoritesRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Favorites::from))
    }

    fn save(&self, fav: &Favorites, expected_version: Option<i64>) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let written = match expected_version {
            None => diesel::insert_into(favorites::table)
                .values(&FavoritesRow {
                    session_id: fav.session_id.clone(),
                    product_ids: fav.product_ids.clone(),
                    version: 1,
                    updated_at: fav.updated_at,
                })
                .on_conflict_do_nothing()
                .execute(&mut conn)?,
            Some(version) => diesel::update(
                favorites::table
                    .filter(favorites::session_id.eq(&fav.session_id))
                    .filter(favorites::version.eq(version)),
            )
            .set((
                favorites::product_ids.eq(fav.product_ids.clone()),
                favorites::updated_at.eq(fav.updated_at),
                favorites::version.eq(version + 1),
            ))
            .execute(&mut conn)?,
        };

        if written == 0 {
            return Err(DomainError::Conflict(
                "favorites were modified concurrently".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::test_db::setup_db;

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn toggled_set_round_trips_with_versioning() {
        let (_container, pool) = setup_db().await;
        let repo = DieselFavoritesRepository::new(pool);

        let mut fav = Favorites::new("session-f");
        fav.toggle("prod_1");
        fav.toggle("prod_4");
        repo.save(&fav, None).expect("insert failed");

        let mut stored = repo
            .find_by_session("session-f")
            .expect("find failed")
            .expect("favorites should exist");
        assert_eq!(stored.product_ids, ["prod_1", "prod_4"]);
        assert_eq!(stored.version, 1);

        stored.toggle("prod_1");
        repo.save(&stored, Some(1)).expect("update failed");
        assert!(repo.save(&stored, Some(1)).unwrap_err().is_conflict());

        let stored = repo.find_by_session("session-f").unwrap().unwrap();
        assert_eq!(stored.product_ids, ["prod_4"]);
    }
}

use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::favorites::{Favorites, FavoritesView};
use crate::domain::ports::{CatalogRepository, FavoritesRepository};

use super::{require_id, retry_on_conflict};

pub struct FavoritesService {
    favorites: Arc<dyn FavoritesRepository>,
    catalog: Arc<dyn CatalogRepository>,
}

impl FavoritesService {
    pub fn new(
        favorites: Arc<dyn FavoritesRepository>,
        catalog: Arc<dyn CatalogRepository>,
    ) -> Self {
        Self { favorites, catalog }
    }

    pub fn get_favorites(&self, session_id: &str) -> Result<FavoritesView, DomainError> {
        let Some(favorites) = self.favorites.find_by_session(session_id)? else {
            return Ok(FavoritesView::empty(session_id));
        };
        let products = if favorites.product_ids.is_empty() {
            Vec::new()
        } else {
            self.catalog.find_products(&favorites.product_ids)?
        };
        Ok(FavoritesView {
            session_id: favorites.session_id,
            product_ids: favorites.product_ids,
            products,
        })
    }

    /// Flip a product's membership. Returns `true` when it became a favorite.
    pub fn toggle_favorite(&self, session_id: &str, product_id: &str) -> Result<bool, DomainError> {
        require_id(session_id, "session_id")?;
        if self.catalog.find_product(product_id)?.is_none() {
            return Err(DomainError::not_found("Product"));
        }

        retry_on_conflict("toggle favorite", || {
            let (mut favorites, expected) = match self.favorites.find_by_session(session_id)? {
                Some(f) => {
                    let version = f.version;
                    (f, Some(version))
                }
                None => (Favorites::new(session_id), None),
            };
            let is_favorite = favorites.toggle(product_id);
            self.favorites.save(&favorites, expected)?;
            Ok(is_favorite)
        })
    }
}

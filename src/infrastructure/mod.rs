pub mod cart_repo;
pub mod catalog_repo;
pub mod favorites_repo;
pub mod memory;
pub mod models;
pub mod order_repo;

pub use cart_repo::DieselCartRepository;
pub use catalog_repo::DieselCatalogRepository;
pub use favorites_repo::DieselFavoritesRepository;
pub use memory::InMemoryStore;
pub use order_repo::DieselOrderRepository;

use crate::domain::errors::DomainError;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

use std::sync::Arc;

use crate::domain::catalog::{Banner, Category, Product, ProductFilter};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;

pub struct CatalogService {
    catalog: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    pub fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        self.catalog.list_categories()
    }

    pub fn get_category(&self, id: &str) -> Result<Category, DomainError> {
        self.catalog
            .find_category(id)?
            .ok_or_else(|| DomainError::not_found("Category"))
    }

    pub fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>, DomainError> {
        self.catalog.list_products(&filter.normalized())
    }

    pub fn get_product(&self, id: &str) -> Result<Product, DomainError> {
        self.catalog
            .find_product(id)?
            .ok_or_else(|| DomainError::not_found("Product"))
    }

    pub fn list_banners(&self) -> Result<Vec<Banner>, DomainError> {
        self.catalog.list_banners()
    }
}

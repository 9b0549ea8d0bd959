use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::catalog::{Banner, Category, Product, ProductFilter};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;
use crate::schema::{banners, categories, products};

use super::models::{BannerRow, CategoryRow, ProductRow};

/// Escape `LIKE` metacharacters so `term` only ever matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CatalogRepository for DieselCatalogRepository {
    fn find_product(&self, id: &str) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = products::table
            .filter(products::id.eq(id))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Product::from))
    }

    fn find_products(&self, ids: &[String]) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = products::table
            .filter(products::id.eq_any(ids))
            .select(ProductRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut query = products::table.select(ProductRow::as_select()).into_boxed();
        if let Some(category_id) = &filter.category_id {
            query = query.filter(products::category_id.eq(category_id.clone()));
        }
        if filter.featured == Some(true) {
            query = query.filter(products::is_featured.eq(true));
        }
        if filter.on_sale == Some(true) {
            query = query.filter(products::is_on_sale.eq(true));
        }
        if let Some(term) = &filter.search {
            let pattern = like_pattern(term);
            query = query.filter(
                products::name
                    .ilike(pattern.clone())
                    .or(products::name_tr.ilike(pattern.clone()))
                    .or(products::description.ilike(pattern.clone()))
                    .or(products::description_tr.ilike(pattern)),
            );
        }

        let rows = query
            .order(products::id.asc())
            .offset(filter.skip)
            .limit(filter.limit)
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn find_category(&self, id: &str) -> Result<Option<Category>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = categories::table
            .filter(categories::id.eq(id))
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Category::from))
    }

    fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = categories::table
            .select(CategoryRow::as_select())
            .order(categories::id.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    fn list_banners(&self) -> Result<Vec<Banner>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = banners::table
            .select(BannerRow::as_select())
            .order(banners::id.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Banner::from).collect())
    }
}

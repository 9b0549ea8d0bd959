use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use super::blocking;
use crate::application::catalog_service::CatalogService;
use crate::domain::catalog::{Banner, Category, Product, ProductFilter, DEFAULT_PRODUCT_LIMIT};
use crate::errors::AppError;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProductsParams {
    /// Only products of this category.
    pub category_id: Option<String>,
    /// Case-insensitive match on names and descriptions.
    pub search: Option<String>,
    /// Only featured products when true.
    pub featured: Option<bool>,
    /// Only discounted products when true.
    pub on_sale: Option<bool>,
    /// Page size (default 50, max 100).
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Products to skip.
    #[serde(default)]
    pub skip: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PRODUCT_LIMIT
}

impl From<ListProductsParams> for ProductFilter {
    fn from(p: ListProductsParams) -> Self {
        ProductFilter {
            category_id: p.category_id,
            search: p.search,
            featured: p.featured,
            on_sale: p.on_sale,
            limit: p.limit,
            skip: p.skip,
        }
    }
}

/// GET /api/
#[utoipa::path(get, path = "/api/", responses((status = 200, description = "Service is up")), tag = "catalog")]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "Market API", "status": "running" }))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses((status = 200, description = "All categories", body = [Category])),
    tag = "catalog"
)]
pub async fn list_categories(
    service: web::Data<CatalogService>,
) -> Result<HttpResponse, AppError> {
    let categories = blocking(move || service.list_categories()).await?;
    Ok(HttpResponse::Ok().json(categories))
}

#[utoipa::path(
    get,
    path = "/api/categories/{category_id}",
    params(("category_id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 404, description = "Category not found"),
    ),
    tag = "catalog"
)]
pub async fn get_category(
    service: web::Data<CatalogService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let category = blocking(move || service.get_category(&id)).await?;
    Ok(HttpResponse::Ok().json(category))
}

/// GET /api/products
///
/// Filters combine with AND. `limit` is clamped to 1..=100.
#[utoipa::path(
    get,
    path = "/api/products",
    params(ListProductsParams),
    responses((status = 200, description = "Matching products", body = [Product])),
    tag = "catalog"
)]
pub async fn list_products(
    service: web::Data<CatalogService>,
    query: web::Query<ListProductsParams>,
) -> Result<HttpResponse, AppError> {
    let filter = ProductFilter::from(query.into_inner());
    let products = blocking(move || service.list_products(filter)).await?;
    Ok(HttpResponse::Ok().json(products))
}

#[utoipa::path(
    get,
    path = "/api/products/{product_id}",
    params(("product_id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, description = "Product not found"),
    ),
    tag = "catalog"
)]
pub async fn get_product(
    service: web::Data<CatalogService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let product = blocking(move || service.get_product(&id)).await?;
    Ok(HttpResponse::Ok().json(product))
}

#[utoipa::path(
    get,
    path = "/api/banners",
    responses((status = 200, description = "Home-screen banners", body = [Banner])),
    tag = "catalog"
)]
pub async fn list_banners(service: web::Data<CatalogService>) -> Result<HttpResponse, AppError> {
    let banners = blocking(move || service.list_banners()).await?;
    Ok(HttpResponse::Ok().json(banners))
}

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::money;

pub const DEFAULT_PRODUCT_LIMIT: i64 = 50;
pub const MAX_PRODUCT_LIMIT: i64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub name_tr: String,
    /// Icon name understood by the mobile client.
    pub icon: String,
    pub image_url: String,
    pub color: String,
    pub product_count: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub name_tr: String,
    pub description: String,
    pub description_tr: String,
    #[serde(with = "money")]
    #[schema(value_type = f64, example = 24.90)]
    pub price: BigDecimal,
    /// Present only while the product is on sale.
    #[serde(default, with = "money::option")]
    #[schema(value_type = Option<f64>, example = 29.90)]
    pub original_price: Option<BigDecimal>,
    pub category_id: String,
    pub image_url: String,
    /// Selling unit, e.g. "kg" or "adet".
    pub unit: String,
    pub stock: i32,
    pub is_featured: bool,
    pub is_on_sale: bool,
    pub discount_percent: Option<i32>,
    pub rating: f64,
    pub review_count: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Banner {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub image_url: String,
    pub background_color: String,
    /// One of "category", "product" or "promo".
    pub link_type: String,
    pub link_id: Option<String>,
}

/// Product listing criteria. `featured`/`on_sale` only restrict when `true`.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category_id: Option<String>,
    pub search: Option<String>,
    pub featured: Option<bool>,
    pub on_sale: Option<bool>,
    pub limit: i64,
    pub skip: i64,
}

impl ProductFilter {
    /// Clamp paging values into their accepted ranges and drop blank search terms.
    pub fn normalized(mut self) -> Self {
        self.limit = if self.limit <= 0 {
            DEFAULT_PRODUCT_LIMIT
        } else {
            self.limit.min(MAX_PRODUCT_LIMIT)
        };
        self.skip = self.skip.max(0);
        self.search = self
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category_id) = &self.category_id {
            if &product.category_id != category_id {
                return false;
            }
        }
        if self.featured == Some(true) && !product.is_featured {
            return false;
        }
        if self.on_sale == Some(true) && !product.is_on_sale {
            return false;
        }
        match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                [
                    &product.name,
                    &product.name_tr,
                    &product.description,
                    &product.description_tr,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
            }
            None => true,
        }
    }
}

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::cart::{Cart, CartLineItem};
use crate::domain::catalog::{Banner, Category, Product};
use crate::domain::errors::DomainError;
use crate::domain::favorites::Favorites;
use crate::domain::order::{DeliveryAddress, Order, OrderLine, OrderStatus};
use crate::schema::{banners, carts, categories, favorites, orders, products};

fn corrupt(what: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::Internal(format!("corrupt {what} document: {e}"))
}

// ── Catalog ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    pub id: String,
    pub name: String,
    pub name_tr: String,
    pub icon: String,
    pub image_url: String,
    pub color: String,
    pub product_count: i32,
}

impl From<CategoryRow> for Category {
    fn from(r: CategoryRow) -> Self {
        Category {
            id: r.id,
            name: r.name,
            name_tr: r.name_tr,
            icon: r.icon,
            image_url: r.image_url,
            color: r.color,
            product_count: r.product_count,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub name_tr: String,
    pub description: String,
    pub description_tr: String,
    pub price: BigDecimal,
    pub original_price: Option<BigDecimal>,
    pub category_id: String,
    pub image_url: String,
    pub unit: String,
    pub stock: i32,
    pub is_featured: bool,
    pub is_on_sale: bool,
    pub discount_percent: Option<i32>,
    pub rating: f64,
    pub review_count: i32,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            id: r.id,
            name: r.name,
            name_tr: r.name_tr,
            description: r.description,
            description_tr: r.description_tr,
            price: r.price,
            original_price: r.original_price,
            category_id: r.category_id,
            image_url: r.image_url,
            unit: r.unit,
            stock: r.stock,
            is_featured: r.is_featured,
            is_on_sale: r.is_on_sale,
            discount_percent: r.discount_percent,
            rating: r.rating,
            review_count: r.review_count,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = banners)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BannerRow {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub image_url: String,
    pub background_color: String,
    pub link_type: String,
    pub link_id: Option<String>,
}

impl From<BannerRow> for Banner {
    fn from(r: BannerRow) -> Self {
        Banner {
            id: r.id,
            title: r.title,
            subtitle: r.subtitle,
            image_url: r.image_url,
            background_color: r.background_color,
            link_type: r.link_type,
            link_id: r.link_id,
        }
    }
}

// ── Session documents ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = carts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartRow {
    pub session_id: String,
    pub items: Value,
    pub version: i64,
    pub updated_at: DateTime<Utc>,
}

impl CartRow {
    pub fn from_cart(cart: &Cart, version: i64) -> Result<Self, DomainError> {
        Ok(CartRow {
            session_id: cart.session_id.clone(),
            items: serde_json::to_value(&cart.items).map_err(|e| corrupt("cart", e))?,
            version,
            updated_at: cart.updated_at,
        })
    }
}

impl TryFrom<CartRow> for Cart {
    type Error = DomainError;

    fn try_from(r: CartRow) -> Result<Self, Self::Error> {
        let items: Vec<CartLineItem> =
            serde_json::from_value(r.items).map_err(|e| corrupt("cart", e))?;
        Ok(Cart {
            session_id: r.session_id,
            items,
            updated_at: r.updated_at,
            version: r.version,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = favorites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FavoritesRow {
    pub session_id: String,
    pub product_ids: Vec<String>,
    pub version: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<FavoritesRow> for Favorites {
    fn from(r: FavoritesRow) -> Self {
        Favorites {
            session_id: r.session_id,
            product_ids: r.product_ids,
            updated_at: r.updated_at,
            version: r.version,
        }
    }
}

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Insertable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub session_id: String,
    pub items: Value,
    pub subtotal: BigDecimal,
    pub delivery_fee: BigDecimal,
    pub total: BigDecimal,
    pub delivery_address: Value,
    pub delivery_date: String,
    pub delivery_time_slot: String,
    pub payment_method: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&Order> for OrderRow {
    type Error = DomainError;

    fn try_from(o: &Order) -> Result<Self, Self::Error> {
        Ok(OrderRow {
            id: o.id,
            session_id: o.session_id.clone(),
            items: serde_json::to_value(&o.items).map_err(|e| corrupt("order", e))?,
            subtotal: o.subtotal.clone(),
            delivery_fee: o.delivery_fee.clone(),
            total: o.total.clone(),
            delivery_address: serde_json::to_value(&o.delivery_address)
                .map_err(|e| corrupt("order", e))?,
            delivery_date: o.delivery_date.clone(),
            delivery_time_slot: o.delivery_time_slot.clone(),
            payment_method: o.payment_method.clone(),
            status: o.status.as_str().to_string(),
            created_at: o.created_at,
        })
    }
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(r: OrderRow) -> Result<Self, Self::Error> {
        let items: Vec<OrderLine> =
            serde_json::from_value(r.items).map_err(|e| corrupt("order", e))?;
        let delivery_address: DeliveryAddress =
            serde_json::from_value(r.delivery_address).map_err(|e| corrupt("order", e))?;
        let status: OrderStatus = r.status.parse().map_err(|e: String| corrupt("order", e))?;
        Ok(Order {
            id: r.id,
            session_id: r.session_id,
            items,
            subtotal: r.subtotal,
            delivery_fee: r.delivery_fee,
            total: r.total,
            delivery_address,
            delivery_date: r.delivery_date,
            delivery_time_slot: r.delivery_time_slot,
            payment_method: r.payment_method,
            status,
            created_at: r.created_at,
        })
    }
}

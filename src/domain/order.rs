use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::cart::CartLineItem;
use super::catalog::Product;
use super::money;

pub const DEFAULT_PAYMENT_METHOD: &str = "cash_on_delivery";

/// Subtotal at or above which delivery is free.
pub fn free_delivery_threshold() -> BigDecimal {
    BigDecimal::from(300)
}

/// Flat delivery fee charged below the free-delivery threshold (14.90).
pub fn flat_delivery_fee() -> BigDecimal {
    BigDecimal::new(1490.into(), 2)
}

pub fn delivery_fee_for(subtotal: &BigDecimal) -> BigDecimal {
    if *subtotal < free_delivery_threshold() {
        flat_delivery_fee()
    } else {
        BigDecimal::zero()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeliveryAddress {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub district: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    OnTheWay,
    Delivered,
}

impl OrderStatus {
    /// Status every newly placed order starts in.
    pub const INITIAL: OrderStatus = OrderStatus::Confirmed;

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OnTheWay => "on_the_way",
            OrderStatus::Delivered => "delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "preparing" => Ok(OrderStatus::Preparing),
            "on_the_way" => Ok(OrderStatus::OnTheWay),
            "delivered" => Ok(OrderStatus::Delivered),
            other => Err(format!("unknown order status '{other}'")),
        }
    }
}

/// Frozen copy of a purchased product, independent of later catalog edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub product_id: String,
    pub product_name: String,
    pub product_name_tr: String,
    #[serde(with = "money")]
    #[schema(value_type = f64, example = 24.90)]
    pub price: BigDecimal,
    pub quantity: i32,
    #[serde(with = "money")]
    #[schema(value_type = f64, example = 49.80)]
    pub total: BigDecimal,
    pub image_url: String,
}

impl OrderLine {
    pub fn snapshot(product: &Product, quantity: i32) -> Self {
        Self {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            product_name_tr: product.name_tr.clone(),
            price: product.price.clone(),
            quantity,
            total: &product.price * BigDecimal::from(quantity),
            image_url: product.image_url.clone(),
        }
    }
}

/// Priced lines of an order, before delivery details are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLines {
    pub items: Vec<OrderLine>,
    pub subtotal: BigDecimal,
    pub delivery_fee: BigDecimal,
    pub total: BigDecimal,
}

impl PricedLines {
    /// Snapshot and price `lines` against `catalog`. Lines whose product no
    /// longer resolves are skipped.
    pub fn price(lines: &[CartLineItem], catalog: &[Product]) -> Self {
        let items: Vec<OrderLine> = lines
            .iter()
            .filter_map(|line| {
                catalog
                    .iter()
                    .find(|p| p.id == line.product_id)
                    .map(|p| OrderLine::snapshot(p, line.quantity))
            })
            .collect();
        let subtotal = items
            .iter()
            .fold(BigDecimal::zero(), |acc, line| acc + &line.total);
        let subtotal = subtotal.with_scale(money::SCALE);
        let delivery_fee = delivery_fee_for(&subtotal).with_scale(money::SCALE);
        let total = (&subtotal + &delivery_fee).with_scale(money::SCALE);
        Self {
            items,
            subtotal,
            delivery_fee,
            total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub session_id: String,
    pub items: Vec<OrderLine>,
    #[serde(with = "money")]
    #[schema(value_type = f64, example = 49.80)]
    pub subtotal: BigDecimal,
    #[serde(with = "money")]
    #[schema(value_type = f64, example = 14.90)]
    pub delivery_fee: BigDecimal,
    #[serde(with = "money")]
    #[schema(value_type = f64, example = 64.70)]
    pub total: BigDecimal,
    pub delivery_address: DeliveryAddress,
    pub delivery_date: String,
    pub delivery_time_slot: String,
    pub payment_method: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Checkout details supplied by the client.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub session_id: String,
    pub delivery_address: DeliveryAddress,
    pub delivery_date: String,
    pub delivery_time_slot: String,
    pub payment_method: String,
}

impl Order {
    pub fn place(request: OrderRequest, priced: PricedLines) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id: request.session_id,
            items: priced.items,
            subtotal: priced.subtotal,
            delivery_fee: priced.delivery_fee,
            total: priced.total,
            delivery_address: request.delivery_address,
            delivery_date: request.delivery_date,
            delivery_time_slot: request.delivery_time_slot,
            payment_method: request.payment_method,
            status: OrderStatus::INITIAL,
            created_at: Utc::now(),
        }
    }
}

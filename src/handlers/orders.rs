use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use super::blocking;
use crate::application::order_service::OrderService;
use crate::domain::order::{DeliveryAddress, Order, OrderRequest, DEFAULT_PAYMENT_METHOD};
use crate::errors::AppError;

// ── Request DTOs ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub session_id: String,
    pub delivery_address: DeliveryAddress,
    pub delivery_date: String,
    pub delivery_time_slot: String,
    /// Defaults to "cash_on_delivery".
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
}

fn default_payment_method() -> String {
    DEFAULT_PAYMENT_METHOD.to_string()
}

impl From<CreateOrderRequest> for OrderRequest {
    fn from(r: CreateOrderRequest) -> Self {
        OrderRequest {
            session_id: r.session_id,
            delivery_address: r.delivery_address,
            delivery_date: r.delivery_date,
            delivery_time_slot: r.delivery_time_slot,
            payment_method: r.payment_method,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/orders
///
/// Turns the session's cart into an order. The order insert and the cart
/// reset are committed in a single database transaction.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order placed", body = Order),
        (status = 400, description = "Cart is empty"),
        (status = 409, description = "Cart kept changing during checkout"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<OrderService>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let request = OrderRequest::from(body.into_inner());
    let order = blocking(move || service.create_order(request)).await?;
    Ok(HttpResponse::Ok().json(order))
}

/// GET /api/orders/{session_id}
///
/// Newest orders first.
#[utoipa::path(
    get,
    path = "/api/orders/{session_id}",
    params(("session_id" = String, Path, description = "Client session id")),
    responses((status = 200, description = "Orders of the session", body = [Order])),
    tag = "orders"
)]
pub async fn list_orders(
    service: web::Data<OrderService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session_id = path.into_inner();
    let orders = blocking(move || service.list_orders(&session_id)).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// GET /api/orders/{session_id}/{order_id}
#[utoipa::path(
    get,
    path = "/api/orders/{session_id}/{order_id}",
    params(
        ("session_id" = String, Path, description = "Client session id"),
        ("order_id" = String, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 404, description = "No such order under this session"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<OrderService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (session_id, order_id) = path.into_inner();
    let order = blocking(move || service.get_order(&session_id, &order_id)).await?;
    Ok(HttpResponse::Ok().json(order))
}

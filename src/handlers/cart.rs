use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{blocking, MessageResponse};
use crate::application::cart_service::CartService;
use crate::domain::cart::{Cart, CartView};
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemRequest {
    pub product_id: String,
    /// Units to add. Defaults to 1.
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    pub product_id: String,
    /// New quantity; zero or less removes the line.
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartMutationResponse {
    pub message: String,
    pub cart: Cart,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/cart/{session_id}
///
/// Returns the stored lines and the catalog products they still resolve to.
#[utoipa::path(
    get,
    path = "/api/cart/{session_id}",
    params(("session_id" = String, Path, description = "Client session id")),
    responses((status = 200, description = "Cart with product details", body = CartView)),
    tag = "cart"
)]
pub async fn get_cart(
    service: web::Data<CartService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session_id = path.into_inner();
    let view = blocking(move || service.get_cart(&session_id)).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/cart/{session_id}/add
#[utoipa::path(
    post,
    path = "/api/cart/{session_id}/add",
    params(("session_id" = String, Path, description = "Client session id")),
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Item added", body = CartMutationResponse),
        (status = 400, description = "Invalid quantity"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Cart kept changing concurrently"),
    ),
    tag = "cart"
)]
pub async fn add_item(
    service: web::Data<CartService>,
    path: web::Path<String>,
    body: web::Json<AddItemRequest>,
) -> Result<HttpResponse, AppError> {
    let session_id = path.into_inner();
    let body = body.into_inner();
    let cart =
        blocking(move || service.add_item(&session_id, &body.product_id, body.quantity)).await?;
    Ok(HttpResponse::Ok().json(CartMutationResponse {
        message: "Item added to cart".to_string(),
        cart,
    }))
}

/// PUT /api/cart/{session_id}/update
#[utoipa::path(
    put,
    path = "/api/cart/{session_id}/update",
    params(("session_id" = String, Path, description = "Client session id")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Cart updated", body = CartMutationResponse),
        (status = 404, description = "Cart not found, or item not in cart"),
    ),
    tag = "cart"
)]
pub async fn update_item(
    service: web::Data<CartService>,
    path: web::Path<String>,
    body: web::Json<UpdateItemRequest>,
) -> Result<HttpResponse, AppError> {
    let session_id = path.into_inner();
    let body = body.into_inner();
    let cart =
        blocking(move || service.update_item(&session_id, &body.product_id, body.quantity))
            .await?;
    Ok(HttpResponse::Ok().json(CartMutationResponse {
        message: "Cart updated".to_string(),
        cart,
    }))
}

/// DELETE /api/cart/{session_id}/remove/{product_id}
#[utoipa::path(
    delete,
    path = "/api/cart/{session_id}/remove/{product_id}",
    params(
        ("session_id" = String, Path, description = "Client session id"),
        ("product_id" = String, Path, description = "Product to drop from the cart"),
    ),
    responses(
        (status = 200, description = "Item removed (or was already absent)", body = MessageResponse),
        (status = 404, description = "Cart not found"),
    ),
    tag = "cart"
)]
pub async fn remove_item(
    service: web::Data<CartService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (session_id, product_id) = path.into_inner();
    blocking(move || service.remove_item(&session_id, &product_id)).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Item removed from cart")))
}

/// DELETE /api/cart/{session_id}/clear
#[utoipa::path(
    delete,
    path = "/api/cart/{session_id}/clear",
    params(("session_id" = String, Path, description = "Client session id")),
    responses((status = 200, description = "Cart emptied", body = MessageResponse)),
    tag = "cart"
)]
pub async fn clear_cart(
    service: web::Data<CartService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session_id = path.into_inner();
    blocking(move || service.clear_cart(&session_id)).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Cart cleared")))
}

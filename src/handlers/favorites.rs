use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use super::blocking;
use crate::application::favorites_service::FavoritesService;
use crate::domain::favorites::FavoritesView;
use crate::errors::AppError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleFavoriteResponse {
    pub message: String,
    pub is_favorite: bool,
}

/// GET /api/favorites/{session_id}
#[utoipa::path(
    get,
    path = "/api/favorites/{session_id}",
    params(("session_id" = String, Path, description = "Client session id")),
    responses((status = 200, description = "Favorite products", body = FavoritesView)),
    tag = "favorites"
)]
pub async fn get_favorites(
    service: web::Data<FavoritesService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session_id = path.into_inner();
    let view = blocking(move || service.get_favorites(&session_id)).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/favorites/{session_id}/toggle/{product_id}
#[utoipa::path(
    post,
    path = "/api/favorites/{session_id}/toggle/{product_id}",
    params(
        ("session_id" = String, Path, description = "Client session id"),
        ("product_id" = String, Path, description = "Product to toggle"),
    ),
    responses(
        (status = 200, description = "Membership flipped", body = ToggleFavoriteResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "favorites"
)]
pub async fn toggle_favorite(
    service: web::Data<FavoritesService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (session_id, product_id) = path.into_inner();
    let is_favorite = blocking(move || service.toggle_favorite(&session_id, &product_id)).await?;
    Ok(HttpResponse::Ok().json(ToggleFavoriteResponse {
        message: "Favorite toggled".to_string(),
        is_favorite,
    }))
}

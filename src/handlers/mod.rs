pub mod cart;
pub mod catalog;
pub mod favorites;
pub mod orders;

use actix_web::web;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::errors::DomainError;
use crate::errors::AppError;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Run a repository-backed service call on the blocking thread pool.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    Ok(web::block(f).await??)
}

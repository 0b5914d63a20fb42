pub mod email;
pub mod upload;

use crate::api::error::AppError;

/// Any method or path the gateway does not serve
pub async fn not_found() -> AppError {
    AppError::NotFound
}

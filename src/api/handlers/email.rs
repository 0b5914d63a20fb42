use crate::AppState;
use crate::api::error::AppError;
use crate::services::email_service::{EmailError, EmailRequest};
use axum::{
    Json,
    body::{Body, to_bytes},
    extract::State,
};
use serde_json::Value;

/// Contact-form bodies are small; anything bigger is refused while reading.
pub const EMAIL_BODY_LIMIT: usize = 1024 * 1024;

#[utoipa::path(
    post,
    path = "/send-email",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Provider response, passed through"),
        (status = 500, description = "Bad body, missing API key or provider failure")
    ),
    tag = "email"
)]
pub async fn send_email(
    State(state): State<AppState>,
    body: Body,
) -> Result<Json<Value>, AppError> {
    let body = to_bytes(body, EMAIL_BODY_LIMIT)
        .await
        .map_err(|e| EmailError::UnreadableBody(e.to_string()))?;

    let data = state.email_service.relay(&body).await?;
    Ok(Json(data))
}

use crate::AppState;
use crate::api::error::AppError;
use crate::services::upload_service::UploadResponse;
use crate::utils::validation::{UploadContext, file_too_large, validate_upload};
use axum::{
    Json,
    body::{Body, to_bytes},
    extract::{RawQuery, State},
    http::{HeaderMap, header},
};
use serde::Deserialize;
use utoipa::IntoParams;

pub const AUTH_SECRET_HEADER: &str = "x-auth-secret";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadQuery {
    /// Original name of the recorded file
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
}

/// First value of `name` in a query string. Repeated keys are allowed.
fn first_query_value(query: Option<&str>, name: &str) -> Option<String> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(query?)
        .ok()?
        .into_iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}

fn header_str<'a>(headers: &'a HeaderMap, name: impl header::AsHeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[utoipa::path(
    post,
    path = "/upload",
    params(UploadQuery),
    request_body(content = Vec<u8>, description = "Raw audio or video bytes", content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing name, empty body or disallowed type"),
        (status = 401, description = "Shared secret mismatch"),
        (status = 413, description = "File too large"),
        (status = 500, description = "Object store write failed")
    ),
    tag = "upload"
)]
pub async fn upload_file(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<UploadResponse>, AppError> {
    let file_name = first_query_value(query.as_deref(), "fileName");

    let ctx = UploadContext {
        file_name: file_name.as_deref(),
        content_length: UploadContext::parse_content_length(header_str(
            &headers,
            header::CONTENT_LENGTH,
        )),
        content_type: header_str(&headers, header::CONTENT_TYPE),
        auth_secret: header_str(&headers, AUTH_SECRET_HEADER),
    };

    let upload = validate_upload(&ctx, &state.upload_rules).inspect_err(|e| {
        tracing::warn!("Upload rejected: {}", e);
    })?;

    // Content-Length is client supplied, so the read is capped as well. A failed
    // read is reported as oversize; a client that hung up never sees the reply.
    let limit = usize::try_from(state.upload_rules.max_file_size).unwrap_or(usize::MAX);
    let data = to_bytes(body, limit).await.map_err(|e| {
        tracing::warn!("Upload body rejected: {}", e);
        AppError::from(file_too_large(&state.upload_rules))
    })?;

    let res = state
        .upload_service
        .store(upload, data)
        .await
        .map_err(|e| AppError::UploadFailed(e.to_string()))?;

    Ok(Json(res))
}

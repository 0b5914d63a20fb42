//! Relay of contact-form email through the Resend HTTP API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;

/// Body accepted by `/send-email`
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EmailRequest {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub html: String,
    pub to: Option<String>,
}

/// Body sent to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("{0}")]
    UnreadableBody(String),

    #[error("{0}")]
    InvalidRequest(#[from] serde_json::Error),

    #[error("RESEND_API_KEY not configured")]
    NotConfigured,

    #[error("{0}")]
    Provider(String),

    #[error("{0}")]
    InvalidResponse(serde_json::Error),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait EmailClient: Send + Sync {
    /// Sends one message and returns the provider's JSON reply.
    async fn send(&self, email: &OutboundEmail) -> Result<Value, EmailError>;
}

pub struct ResendClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ResendClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/emails", self.base_url)
    }
}

#[async_trait]
impl EmailClient for ResendClient {
    async fn send(&self, email: &OutboundEmail) -> Result<Value, EmailError> {
        let res = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = res.status();
        let body = res.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&body)
                .ok()
                .and_then(|data| data.get("message")?.as_str().map(str::to_string))
                .unwrap_or_else(|| "Failed to send email".to_string());
            return Err(EmailError::Provider(message));
        }

        serde_json::from_slice(&body).map_err(EmailError::InvalidResponse)
    }
}

pub struct EmailService {
    client: Option<Arc<dyn EmailClient>>,
    from: String,
    default_to: String,
}

impl EmailService {
    /// `client` is `None` when no provider key is configured.
    pub fn new(client: Option<Arc<dyn EmailClient>>, from: String, default_to: String) -> Self {
        Self {
            client,
            from,
            default_to,
        }
    }

    /// Parses a raw request body and forwards it to the provider.
    pub async fn relay(&self, body: &[u8]) -> Result<Value, EmailError> {
        let request: EmailRequest = serde_json::from_slice(body)?;
        let client = self.client.as_ref().ok_or(EmailError::NotConfigured)?;

        let email = self.compose(request);
        let data = client.send(&email).await?;

        tracing::info!("Relayed email to={} subject={:?}", email.to, email.subject);
        Ok(data)
    }

    fn compose(&self, request: EmailRequest) -> OutboundEmail {
        let to = request
            .to
            .filter(|to| !to.is_empty())
            .unwrap_or_else(|| self.default_to.clone());

        OutboundEmail {
            from: self.from.clone(),
            to,
            subject: request.subject,
            html: request.html,
        }
    }
}

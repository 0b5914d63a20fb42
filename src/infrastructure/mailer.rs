use crate::config::GatewayConfig;
use crate::services::email_service::{EmailClient, ResendClient};
use std::sync::Arc;
use tracing::{info, warn};

/// Returns the Resend client, or `None` when `RESEND_API_KEY` is unset.
pub fn setup_mailer(config: &GatewayConfig) -> Option<Arc<dyn EmailClient>> {
    match &config.resend_api_key {
        Some(key) => {
            info!("✉️  Email relay: {}", config.resend_api_url);
            Some(Arc::new(ResendClient::new(
                key.clone(),
                config.resend_api_url.clone(),
            )))
        }
        None => {
            warn!("✉️  RESEND_API_KEY not set; /send-email will report an error");
            None
        }
    }
}

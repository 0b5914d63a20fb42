pub mod api;
pub mod config;
pub mod infrastructure;
pub mod services;
pub mod utils;

use crate::config::GatewayConfig;
use crate::services::clock::Clock;
use crate::services::email_service::{EmailClient, EmailService};
use crate::services::storage::StorageService;
use crate::services::upload_service::UploadService;
use crate::utils::validation::UploadRules;
use axum::{Router, middleware::from_fn_with_state, routing::post};
use std::sync::Arc;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::upload::upload_file,
        api::handlers::email::send_email,
    ),
    components(
        schemas(
            services::upload_service::UploadResponse,
            services::email_service::EmailRequest,
        )
    ),
    tags(
        (name = "upload", description = "Audio and video uploads"),
        (name = "email", description = "Contact form email relay")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub upload_rules: Arc<UploadRules>,
    pub upload_service: Arc<UploadService>,
    pub email_service: Arc<EmailService>,
}

impl AppState {
    pub fn new(
        config: GatewayConfig,
        storage: Arc<dyn StorageService>,
        mailer: Option<Arc<dyn EmailClient>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let upload_service = Arc::new(UploadService::new(
            storage,
            clock,
            config.public_bucket_url.clone(),
        ));
        let email_service = Arc::new(EmailService::new(
            mailer,
            config.email_from.clone(),
            config.email_default_to.clone(),
        ));

        Self {
            upload_rules: Arc::new(UploadRules::from_config(&config)),
            config: Arc::new(config),
            upload_service,
            email_service,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route(
            "/upload",
            post(api::handlers::upload::upload_file).fallback(api::handlers::not_found),
        )
        .route(
            "/send-email",
            post(api::handlers::email::send_email).fallback(api::handlers::not_found),
        )
        .fallback(api::handlers::not_found)
        .layer(from_fn_with_state(
            state.clone(),
            api::middleware::cors::cors_middleware,
        ))
        .with_state(state)
}

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use media_gateway::config::GatewayConfig;
use media_gateway::infrastructure::{mailer, storage};
use media_gateway::services::clock::SystemClock;
use media_gateway::services::review_queue;
use media_gateway::{ApiDoc, AppState, create_app};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port for the HTTP server
    #[arg(short, long, default_value_t = 8787)]
    port: u16,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the upload and email gateway (default)
    Serve,
    /// List stored uploads not yet marked as processed
    Pending,
    /// Print the OpenAPI document as JSON
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "media_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(args.port).await,
        Command::Pending => list_pending().await,
        Command::Openapi => {
            println!("{}", ApiDoc::openapi().to_pretty_json()?);
            Ok(())
        }
    }
}

async fn serve(port: u16) -> anyhow::Result<()> {
    info!("🚀 Starting media gateway...");

    let config = GatewayConfig::from_env();
    info!(
        "🛡️  Gateway Config: Max Size={}MB, Origins={:?}, Shared Secret={}",
        config.max_file_size_mb(),
        config.allowed_origins,
        config.auth_secret.is_some()
    );

    let storage_service = storage::setup_storage().await?;
    let mailer = mailer::setup_mailer(&config);
    let state = AppState::new(config, storage_service, mailer, Arc::new(SystemClock));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::http::Request<_>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        })
        .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
            info!("📥 {} {}", request.method(), request.uri());
        })
        .on_response(
            |response: &axum::http::Response<_>,
             latency: std::time::Duration,
             _span: &tracing::Span| {
                info!(
                    "📤 Finished in {:?} with status {}",
                    latency,
                    response.status()
                );
            },
        );

    let app = create_app(state).layer(trace_layer);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("✅ Gateway listening on: http://0.0.0.0:{}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("🛑 Gateway shut down gracefully.");
    Ok(())
}

async fn list_pending() -> anyhow::Result<()> {
    let storage_service = storage::setup_storage().await?;
    let pending = review_queue::pending_uploads(storage_service.as_ref()).await?;

    if pending.is_empty() {
        info!("No new files found.");
        return Ok(());
    }

    for upload in pending {
        let kind = upload
            .kind
            .map(|k| k.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!("{}\t{}", kind, upload.key);
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("⌨️  Ctrl+C received, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("💤 SIGTERM received, starting graceful shutdown...");
        },
    }
}

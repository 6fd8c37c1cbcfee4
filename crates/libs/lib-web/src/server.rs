//! # Server Setup
//!
//! Server initialization, route registration, and HTTP server startup.
//!
//! [`start_server`] loads configuration, builds the token state, starts the
//! background credential refresh and serves the router built by [`create_router`].

// region: --- Imports
use crate::handlers;
use crate::middleware::{log_requests, mw_req_stamp::request_id_of, stamp_req};
use axum::{routing::{get, post}, Router};
use lib_core::Config;
use lib_solana::SolanaState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub solana: Arc<SolanaState>,
}

impl axum::extract::FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<SolanaState> {
    fn from_ref(state: &AppState) -> Self {
        state.solana.clone()
    }
}
// endregion: --- AppState

// region: --- Server Configuration
/// Server configuration
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:3001")
    pub bind_address: String,
    /// Allowed CORS origins
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3001".to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "http://localhost:8080".to_string(),
                "http://127.0.0.1:8080".to_string(),
            ],
        }
    }
}
// endregion: --- Server Configuration

// region: --- Tracing
/// Load `.env` (or `dotenv_path`), then install the subscriber; returns the level used.
fn init_environment(dotenv_path: Option<&std::path::Path>) -> String {
    // A missing .env file is fine
    let _ = match dotenv_path {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };
    init_tracing()
}

fn init_tracing() -> String {
    let log_level = std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase();

    let filter = match log_level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => tracing_subscriber::EnvFilter::new(&log_level),
        _ => tracing_subscriber::EnvFilter::new("info"),
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .try_init();

    match installed {
        Ok(()) => info!(" Log level: {}", log_level),
        // Embedders may already own the global subscriber
        Err(e) => warn!("Tracing subscriber not installed: {}", e),
    }
    log_level
}
// endregion: --- Tracing

// region: --- Server Setup
/// Initialize and start the HTTP server
///
/// # Errors
///
/// This function will return an error if:
/// - Configuration loading or validation fails
/// - An HTTP client cannot be built
/// - Server binding fails
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    init_environment(None);
    info!(" TOKEN INTELLIGENCE BACKEND STARTING");

    info!("Loading configuration...");
    let app_config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    app_config.validate().map_err(|e| anyhow::anyhow!(e))?;
    info!("Configuration: {:?}", app_config);

    let solana = Arc::new(SolanaState::new(&app_config)?);
    let _refresh_task = solana.start_background_refresh();

    let state = AppState {
        config: app_config,
        solana,
    };

    let app = create_router(state, config.allowed_origins.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;

    info!(" SERVER READY: http://{}", config.bind_address);
    log_server_info();

    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the main application router with all routes
pub fn create_router(state: AppState, allowed_origins: Vec<String>) -> Router {
    use axum::http::{HeaderValue, Method};

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    info!("[ROUTE SETUP] Registering HTTP routes...");
    Router::new()
        .route("/api/token/details", post(handlers::token::post_token_details))
        .route("/api/token/{address}", get(handlers::token::get_token_details))
        .route("/api/token/{address}/chart", get(handlers::token::get_chart_data))
        .route("/api/credentials/status", get(handlers::credentials::get_status))
        .route("/api/credentials/refresh", post(handlers::credentials::post_refresh))
        .route("/api/tools", get(handlers::tools::list_tools))
        .route("/api/tools/call", post(handlers::tools::call_tool))
        .route("/health", get(|| async { "OK" }))
        .fallback(|| async {
            info!("[404 HANDLER] Unmatched route - returning 404");
            (axum::http::StatusCode::NOT_FOUND, "Route not found")
        })
        .with_state(state)
        // Runs after stamp_req (outer layers run first)
        .layer(axum::middleware::from_fn(log_requests))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id_of(request),
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_failure(|error: tower_http::classify::ServerErrorsFailureClass, latency: std::time::Duration, _span: &tracing::Span| {
                    tracing::error!(
                        error = ?error,
                        latency_ms = latency.as_millis(),
                        "[HTTP FAILURE] Error: {:?}, Latency: {}ms",
                        error,
                        latency.as_millis()
                    );
                })
        )
        .layer(axum::middleware::from_fn(stamp_req))
        .layer(cors)
}

/// Log server information
fn log_server_info() {
    info!(" TOKENS:");
    info!("   • POST /api/token/details  {{\"token_address\": \"<mint>\"}}");
    info!("   • GET  /api/token/{{address}}");
    info!("   • GET  /api/token/{{address}}/chart");
    info!(" CREDENTIALS:");
    info!("   • GET  /api/credentials/status");
    info!("   • POST /api/credentials/refresh");
    info!(" TOOLS:");
    info!("   • GET  /api/tools");
    info!("   • POST /api/tools/call");
    info!(" HEALTH:");
    info!("   • GET  /health");
}
// endregion: --- Server Setup

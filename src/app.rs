use std::any::Any;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::auth::{CookieSessionStore, SessionVerifier};
use crate::config::{AppConfig, SecurityConfig};
use crate::database::{DatabaseManager, PgProfileStore, PgUserDirectory, ProfileStore, UserDirectory};
use crate::error::ApiError;
use crate::handlers;

const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Collaborators shared by every request. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionVerifier>,
    pub users: Arc<dyn UserDirectory>,
    pub profiles: Arc<dyn ProfileStore>,
    /// Upper bound for buffering a request body once the caller is known.
    pub body_limit: usize,
}

impl AppState {
    pub fn new(
        sessions: Arc<dyn SessionVerifier>,
        users: Arc<dyn UserDirectory>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            sessions,
            users,
            profiles,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    pub fn with_body_limit(mut self, body_limit: usize) -> Self {
        self.body_limit = body_limit;
        self
    }

    /// Wire the cookie session store and the two Postgres credential tiers.
    pub fn from_database(sessions: CookieSessionStore, database: &DatabaseManager) -> Self {
        Self::new(
            Arc::new(sessions),
            Arc::new(PgUserDirectory::new(database.user_pool().clone())),
            Arc::new(PgProfileStore::new(database.service_pool().clone())),
        )
    }
}

pub fn router(state: AppState, config: &AppConfig) -> Router {
    let state = state.with_body_limit(config.api.max_request_size_bytes);

    Router::new()
        // Public
        .route("/", get(handlers::system::root))
        .route("/health", get(handlers::system::health))
        // Session-authenticated
        .route("/api/profile", patch(handlers::profile::patch))
        .with_state(state)
        // Global middleware
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(&config.security))
        .layer(TraceLayer::new_for_http())
}

/// Cookie auth needs credentialed CORS, which rules out a wildcard origin.
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Last-resort conversion of a handler panic into the generic 500 body.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    ApiError::unexpected(detail).into_response()
}

/// Connect collaborators from configuration and serve until shutdown.
pub async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting SIWE Profile API in {:?} mode", config.environment);

    let sessions = CookieSessionStore::from_config(&config.session, config.security.require_https)?;
    let database = DatabaseManager::connect(&config.database).await?;
    let app = router(AppState::from_database(sessions, &database), config);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("SIWE Profile API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    database.close_all().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

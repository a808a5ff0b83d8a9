use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    ConnectOptions, PgPool,
};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the database layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("User and service credentials must differ")]
    SharedCredentials,

    #[error("Multiple users match address {0}")]
    AmbiguousAddress(String),

    #[error("Invalid value for column {column}: {reason}")]
    InvalidValue { column: &'static str, reason: String },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Pool connected with the caller-privilege role. Reads through it are subject
/// to row-level security.
#[derive(Debug, Clone)]
pub struct UserPool(PgPool);

/// Pool connected with the service role, which bypasses row-level security.
/// Only the profile write path holds one.
#[derive(Debug, Clone)]
pub struct ServicePool(PgPool);

impl UserPool {
    pub fn new(pool: PgPool) -> Self {
        Self(pool)
    }

    pub fn pool(&self) -> &PgPool {
        &self.0
    }
}

impl ServicePool {
    pub fn new(pool: PgPool) -> Self {
        Self(pool)
    }

    pub fn pool(&self) -> &PgPool {
        &self.0
    }
}

/// Owns the two credential tiers
#[derive(Debug, Clone)]
pub struct DatabaseManager {
    user: UserPool,
    service: ServicePool,
}

impl DatabaseManager {
    /// Connect both pools. Fails if either URL is missing or both name the
    /// same credentials.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let user_url = config
            .user_url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let service_url = config
            .service_url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_SERVICE_URL"))?;

        if user_url == service_url {
            return Err(DatabaseError::SharedCredentials);
        }

        let user = Self::create_pool(config, user_url).await?;
        info!("Created user-tier database pool for: {}", redact_url(user_url)?);

        let service = Self::create_pool(config, service_url).await?;
        info!("Created service-tier database pool for: {}", redact_url(service_url)?);

        Ok(Self {
            user: UserPool(user),
            service: ServicePool(service),
        })
    }

    async fn create_pool(config: &DatabaseConfig, url: &str) -> Result<PgPool, DatabaseError> {
        let mut options = PgConnectOptions::from_str(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if !config.enable_query_logging {
            options = options.disable_statement_logging();
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_with(options)
            .await?;

        Ok(pool)
    }

    pub fn user_pool(&self) -> &UserPool {
        &self.user
    }

    pub fn service_pool(&self) -> &ServicePool {
        &self.service
    }

    /// Close both pools (e.g., on shutdown)
    pub async fn close_all(&self) {
        self.user.0.close().await;
        info!("Closed user-tier database pool");
        self.service.0.close().await;
        info!("Closed service-tier database pool");
    }
}

/// Pings a pool to ensure connectivity
pub async fn ping(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Strip credentials from a connection string for logging.
pub fn redact_url(raw: &str) -> Result<String, DatabaseError> {
    let mut url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    if url.password().is_some() {
        url.set_password(Some("***"))
            .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    }
    Ok(url.into())
}

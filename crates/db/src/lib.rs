//! PostgreSQL connection pool
//!
//! [`connect`] parses the URL, builds a pool with the service defaults and
//! pings the database before handing the pool out. Failures are returned to
//! the caller instead of terminating the process.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::Connection;
use svckit_common::{get_env_parsed, ApiError, CodedError, ErrorCode, ErrorParams, StatusCode};

/// Pool sizing and timeouts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: Duration,
    pub idle_timeout: Duration,
    /// Bound on the startup ping and on pool acquires
    pub connect_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 20,
            min_connections: 5,
            max_lifetime: Duration::from_secs(30 * 60),
            idle_timeout: Duration::from_secs(5 * 60),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl PoolConfig {
    /// Defaults overridden by `DB_MAX_CONNECTIONS`, `DB_MIN_CONNECTIONS` and
    /// `DB_CONNECT_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_connections: get_env_parsed("DB_MAX_CONNECTIONS", defaults.max_connections),
            min_connections: get_env_parsed("DB_MIN_CONNECTIONS", defaults.min_connections),
            connect_timeout: Duration::from_secs(get_env_parsed(
                "DB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout.as_secs(),
            )),
            ..defaults
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("unable to parse DATABASE_URL: {0}")]
    InvalidUrl(#[source] sqlx::Error),

    #[error("unable to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("unable to ping database: {0}")]
    Ping(#[source] sqlx::Error),

    #[error("database did not answer within {0:?}")]
    Timeout(Duration),
}

impl From<DbError> for CodedError {
    fn from(err: DbError) -> Self {
        CodedError::new(
            ErrorParams::new()
                .with_http_code(StatusCode::INTERNAL_SERVER_ERROR)
                .with_code(ErrorCode::DbError)
                .with_message("database error")
                .with_source(err),
        )
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        ApiError::Coded(err.into())
    }
}

/// Open a pool with [`PoolConfig::default`]
pub async fn connect(database_url: &str) -> Result<PgPool, DbError> {
    connect_with(database_url, &PoolConfig::default()).await
}

/// Open a pool and verify the database answers within `connect_timeout`
pub async fn connect_with(database_url: &str, config: &PoolConfig) -> Result<PgPool, DbError> {
    let options = PgConnectOptions::from_str(database_url).map_err(|e| {
        tracing::error!(error = %e, "Unable to parse DATABASE_URL");
        DbError::InvalidUrl(e)
    })?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .max_lifetime(config.max_lifetime)
        .idle_timeout(config.idle_timeout)
        .acquire_timeout(config.connect_timeout)
        .connect_lazy_with(options);

    if let Err(e) = ping(&pool, config.connect_timeout).await {
        tracing::error!(error = %e, "Database connection check failed");
        pool.close().await;
        return Err(e);
    }

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Connected to PostgreSQL"
    );
    Ok(pool)
}

async fn ping(pool: &PgPool, timeout: Duration) -> Result<(), DbError> {
    let check = async {
        let mut conn = pool.acquire().await.map_err(DbError::Connect)?;
        conn.ping().await.map_err(DbError::Ping)
    };

    tokio::time::timeout(timeout, check)
        .await
        .map_err(|_| DbError::Timeout(timeout))?
}

/// Close the pool if there is one, waiting for checked-out connections
pub async fn close_pool(pool: Option<&PgPool>) {
    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }
}

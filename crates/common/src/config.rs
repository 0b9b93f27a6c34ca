//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use std::env;
use std::str::FromStr;

use crate::logging::LogConfig;

/// Read `key` from the environment, falling back to `default` when unset
pub fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read and parse `key`, falling back to `default` when unset or unparsable
pub fn get_env_parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a comma-separated list, dropping empty entries
pub fn get_env_list(key: &str, default: &[&str]) -> Vec<String> {
    match env::var(key) {
        Ok(value) => value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => default.iter().map(|item| item.to_string()).collect(),
    }
}

#[derive(Clone)]
pub struct Config {
    /// Postgres connection URL; services without a database leave it unset
    pub database_url: Option<String>,

    /// AWS region used by queue clients
    pub aws_region: String,
    /// Custom AWS endpoint (LocalStack)
    pub aws_endpoint_url: Option<String>,
    /// Queue the service consumes from, if any
    pub queue_url: Option<String>,

    /// Origins allowed by the CORS middleware
    pub allowed_origins: Vec<String>,

    pub port: u16,
    pub log: LogConfig,
}

impl std::fmt::Debug for Config {
    #[mutants::skip] // Debug output only
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("aws_region", &self.aws_region)
            .field("aws_endpoint_url", &self.aws_endpoint_url)
            .field("queue_url", &self.queue_url)
            .field("allowed_origins", &self.allowed_origins)
            .field("port", &self.port)
            .field("log", &self.log)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let config = Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),

            aws_region: get_env("AWS_REGION", "us-east-1"),
            aws_endpoint_url: env::var("AWS_ENDPOINT_URL").ok(),
            queue_url: env::var("QUEUE_URL").ok(),

            allowed_origins: get_env_list("ALLOWED_ORIGINS", &["*"]),

            port: get_env_parsed("PORT", 3000),
            log: LogConfig::from_env(),
        };

        if config.allowed_origins.is_empty() {
            anyhow::bail!("ALLOWED_ORIGINS must list at least one origin");
        }

        Ok(config)
    }
}

// svckit reference service - Local Development Server

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use svckit_app::{create_app, AppState};
use svckit_auth::JwtConfig;
use svckit_common::{Config, Logger};
use svckit_crypto::CryptoConfig;
use svckit_db::{close_pool, connect_with, PoolConfig};
use svckit_http::SecurityHeadersConfig;
use svckit_queue::sqs::SqsQueueClient;
use svckit_queue::{
    receive_messages, EnvelopeHandler, EnvelopeRouter, MessageEnvelope, QueueClient, ReceiveConfig,
};

/// Writes `log` envelopes to the service log
struct LogEnvelope;

#[async_trait::async_trait]
impl EnvelopeHandler for LogEnvelope {
    async fn handle(
        &self,
        envelope: &MessageEnvelope,
    ) -> Result<(), svckit_common::BoxError> {
        info!(kind = %envelope.kind, data = %envelope.data.get(), "Received event");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    Logger::new(&config.log)?.install()?;

    info!("Starting svckit local development server");
    info!(config = ?config, "Configuration loaded successfully");

    let jwt = JwtConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load JWT configuration");
        e
    })?;
    let crypto = CryptoConfig::from_env();

    let pool = match config.database_url.as_deref() {
        Some(url) => Some(connect_with(url, &PoolConfig::from_env()).await?),
        None => {
            warn!("DATABASE_URL not set; running without a database");
            None
        }
    };

    let shutdown = CancellationToken::new();

    let mut state = AppState::new(jwt.manager()?, crypto)
        .with_token_expiry(jwt.expiry)
        .with_security(SecurityHeadersConfig::with_origins(
            config.allowed_origins.clone(),
        ));
    if let Some(pool) = &pool {
        state = state.with_pool(pool.clone());
    }

    let mut consumer = None;
    if let Some(queue_url) = &config.queue_url {
        let client: Arc<dyn QueueClient> = Arc::new(
            SqsQueueClient::new(&config.aws_region, config.aws_endpoint_url.as_deref()).await,
        );
        let router = Arc::new(EnvelopeRouter::new().route("log", LogEnvelope));

        consumer = Some(tokio::spawn(receive_messages(
            Arc::clone(&client),
            queue_url.clone(),
            ReceiveConfig::default(),
            router,
            shutdown.clone(),
        )));
        state = state.with_queue(client, queue_url.clone());
    }

    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Health check available at http://{}/health", addr);

    let token = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            token.cancel();
        })
        .await?;

    shutdown.cancel();
    if let Some(consumer) = consumer {
        if let Err(e) = consumer.await {
            error!(error = %e, "Queue consumer task failed");
        }
    }
    close_pool(pool.as_ref()).await;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}

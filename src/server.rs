//! HTTP server initialization and runtime setup.
//!
//! Handles storage setup, shortener wiring, and Axum server lifecycle.

use crate::api::middleware::owner::OwnerCookie;
use crate::application::services::ShortenerService;
use crate::config::{Config, StorageBackend};
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::persistence::{MemoryUrlRepository, PgUrlRepository};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::{CodeAlphabet, RandomCodeGenerator};

use anyhow::{Context, Result};
use axum::extract::Request;
use axum::routing::IntoMakeService;
use axum::{Router, ServiceExt};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tower_http::normalize_path::NormalizePath;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - URL storage (PostgreSQL pool with migrations, or in-memory map)
/// - Short code generator from `CODE_LENGTH` / `CODE_ALPHABET`
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = build_repository(&config).await?;
    let shortener = build_shortener(repository, &config)?;

    let owner_cookie = OwnerCookie::new(
        config.owner_cookie_max_age_days,
        config.owner_cookie_secure,
    );

    let state = AppState::new(Arc::new(shortener), config.base_url.clone(), owner_cookie);

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wires a shortener over `repository` using the code settings in `config`.
///
/// # Errors
///
/// Returns an error if `CODE_ALPHABET` or `CODE_LENGTH` is invalid.
pub fn build_shortener<R: UrlRepository + ?Sized>(
    repository: Arc<R>,
    config: &Config,
) -> Result<ShortenerService<R>> {
    let alphabet = CodeAlphabet::new(&config.code_alphabet).context("Invalid CODE_ALPHABET")?;
    let generator = RandomCodeGenerator::new(alphabet, config.code_length)
        .context("Invalid short code settings")?;

    Ok(ShortenerService::new(repository, Arc::new(generator))
        .with_max_attempts(config.code_max_attempts))
}

fn make_service(app: NormalizePath<Router>) -> IntoMakeService<NormalizePath<Router>> {
    ServiceExt::<Request>::into_make_service(app)
}

async fn build_repository(config: &Config) -> Result<Arc<dyn UrlRepository>> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, links are lost on restart");
            Ok(Arc::new(MemoryUrlRepository::new()))
        }
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set for the postgres storage backend")?;

            let pool = connect_pool(config, database_url).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Migrations applied");

            Ok(Arc::new(PgUrlRepository::new(Arc::new(pool))))
        }
    }
}

/// Opens the connection pool, retrying with exponential backoff while the
/// database comes up.
async fn connect_pool(config: &Config, database_url: &str) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    let strategy = connect_backoff(config.db_connect_retries).map(jitter);

    let mut attempt = 0usize;
    Retry::start(strategy, || {
        attempt += 1;
        let options = options.clone();
        async move {
            options.connect(database_url).await.inspect_err(|e| {
                tracing::warn!(attempt, error = %e, "Database connection failed");
            })
        }
    })
    .await
    .context("Failed to connect to database")
}

/// Delays between connection attempts: 100ms, 200ms, 400ms, ... capped at
/// 10s, one fewer than `attempts`.
fn connect_backoff(attempts: usize) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(50)
        .max_delay(Duration::from_secs(10))
        .take(attempts.saturating_sub(1))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use tower::ServiceExt as _;

    #[test]
    fn test_connect_backoff_doubles_from_100ms() {
        let delays: Vec<_> = connect_backoff(5).collect();

        assert_eq!(
            delays,
            vec![
                Duration::from_millis(100),
                Duration::from_millis(200),
                Duration::from_millis(400),
                Duration::from_millis(800),
            ]
        );
    }

    #[test]
    fn test_connect_backoff_is_capped() {
        let delays: Vec<_> = connect_backoff(12).collect();

        assert_eq!(delays.len(), 11);
        assert_eq!(delays.last(), Some(&Duration::from_secs(10)));
        assert!(delays.iter().all(|d| *d <= Duration::from_secs(10)));
    }

    #[test]
    fn test_single_attempt_has_no_delays() {
        assert_eq!(connect_backoff(1).count(), 0);
    }

    fn memory_config() -> Config {
        Config {
            storage_backend: StorageBackend::Memory,
            database_url: None,
            listen_addr: "127.0.0.1:0".to_string(),
            base_url: "http://localhost:3000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            code_length: 6,
            code_alphabet: "xyz".to_string(),
            code_max_attempts: 3,
            owner_cookie_max_age_days: 30,
            owner_cookie_secure: false,
            db_max_connections: 1,
            db_connect_timeout: 1,
            db_idle_timeout: 1,
            db_max_lifetime: 1,
            db_connect_retries: 1,
        }
    }

    #[tokio::test]
    async fn test_build_shortener_uses_code_settings() {
        let shortener =
            build_shortener(Arc::new(MemoryUrlRepository::new()), &memory_config()).unwrap();

        assert_eq!(shortener.max_attempts(), 3);

        let record = shortener
            .shorten("https://example.com", "owner")
            .await
            .unwrap();
        assert_eq!(record.short_code.len(), 6);
        assert!(record.short_code.chars().all(|c| "xyz".contains(c)));
    }

    #[test]
    fn test_build_shortener_rejects_bad_alphabet() {
        let mut config = memory_config();
        config.code_alphabet = "a".to_string();

        assert!(build_shortener(Arc::new(MemoryUrlRepository::new()), &config).is_err());
    }

    #[tokio::test]
    async fn test_served_router_needs_no_connect_info() {
        let repository = Arc::new(MemoryUrlRepository::new());
        let shortener = ShortenerService::new(
            repository as Arc<dyn UrlRepository>,
            Arc::new(RandomCodeGenerator::default()),
        );
        let state = AppState::new(
            Arc::new(shortener),
            "http://localhost:3000",
            OwnerCookie::default(),
        );

        let service = make_service(app_router(state)).oneshot(()).await.unwrap();
        let response = service
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}

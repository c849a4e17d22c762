//! Application state for menu-cloud

use std::sync::Arc;

use aws_sdk_sesv2::Client as SesClient;
use sqlx::PgPool;

use crate::auth::TokenService;
use crate::auth::rate_limit::RateLimiter;
use crate::config::{Config, MailTransportKind};
use crate::email::{EmailService, SesTransport};
use crate::storage::FileStorage;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Immutable configuration, loaded once at startup
    pub config: Arc<Config>,
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Session token signer/verifier
    pub tokens: TokenService,
    /// Best-effort notifications
    pub email: EmailService,
    /// Uploaded images
    pub storage: FileStorage,
    /// Rate limiter for the unauthenticated account routes
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Connect, migrate and build every component from `config`
    pub async fn new(config: Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let config = Arc::new(config);
        let email = match config.mail_transport {
            MailTransportKind::Ses => {
                let aws_config =
                    aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
                let ses = if let Some(ses_region) = config.ses_region.clone() {
                    let ses_config = aws_config
                        .to_builder()
                        .region(aws_config::Region::new(ses_region))
                        .build();
                    SesClient::new(&ses_config)
                } else {
                    SesClient::new(&aws_config)
                };
                let transport =
                    SesTransport::new(ses, &config.mail_from_name, &config.mail_from_email);
                EmailService::new(Arc::new(transport), config.clone())
            }
            MailTransportKind::Disabled => {
                tracing::warn!("MAIL_TRANSPORT disabled, notifications will not be delivered");
                EmailService::disabled(config.clone())
            }
        };

        Ok(Self::with_parts(config, pool, email))
    }

    fn with_parts(config: Arc<Config>, pool: PgPool, email: EmailService) -> Self {
        Self {
            tokens: TokenService::new(&config.jwt_secret, &config.jwt_issuer, config.jwt_ttl_secs),
            storage: FileStorage::new(&config.uploads_dir, config.max_upload_bytes),
            rate_limiter: RateLimiter::new(),
            email,
            pool,
            config,
        }
    }

    /// State over a lazy pool that never connects; for router tests that
    /// stop before touching the database
    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        let config = Arc::new(Config::for_tests());
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .expect("lazy pool");
        let email = EmailService::disabled(config.clone());
        Self::with_parts(config, pool, email)
    }
}

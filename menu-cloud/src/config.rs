//! Service configuration
//!
//! Loaded once at startup; components receive it through `AppState`.

use std::path::PathBuf;

use shared::util::non_empty;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// How outgoing mail is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailTransportKind {
    /// AWS SES v2
    Ses,
    /// No delivery; every send reports failure
    Disabled,
}

impl MailTransportKind {
    fn parse(s: &str) -> Result<Self, BoxError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ses" => Ok(Self::Ses),
            "" | "disabled" | "none" => Ok(Self::Disabled),
            other => Err(format!("Unknown MAIL_TRANSPORT: {other}").into()),
        }
    }
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Shared secret for HS256 session tokens
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_ttl_secs: i64,
    /// OTP lifetime for registration and password reset
    pub otp_ttl_secs: i64,
    /// Echo the OTP in the register response (development only)
    pub otp_debug_return: bool,
    pub mail_transport: MailTransportKind,
    /// Region override for SES; the AWS default chain is used when unset
    pub ses_region: Option<String>,
    pub mail_from_email: String,
    pub mail_from_name: String,
    /// Recipient of new registration alerts; alerts are skipped when unset
    pub mail_approval_email: Option<String>,
    pub mail_support_email: String,
    pub approval_panel_url: String,
    pub dashboard_login_url: String,
    /// Base URL of the public menu viewer; the slug is appended
    pub public_menu_base_url: String,
    /// Root directory for uploaded images
    pub uploads_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub bootstrap_admin_email: Option<String>,
    pub bootstrap_admin_password: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        Self::check_secret(name, std::env::var(name).ok(), environment)
    }

    fn check_secret(
        name: &str,
        value: Option<String>,
        environment: &str,
    ) -> Result<String, BoxError> {
        let val = match value {
            Some(v) => v,
            None => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_dev = environment == "development";

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: parse_env("HTTP_PORT", 8080),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "menu_api".into()),
            jwt_ttl_secs: parse_env("JWT_TTL_SECS", 3600),
            otp_ttl_secs: parse_env("OTP_TTL_SECS", 300),
            otp_debug_return: is_dev
                && std::env::var("OTP_DEBUG_RETURN").is_ok_and(|v| v == "1" || v == "true"),
            mail_transport: MailTransportKind::parse(
                &std::env::var("MAIL_TRANSPORT").unwrap_or_default(),
            )?,
            ses_region: non_empty(std::env::var("SES_REGION").ok().as_deref()),
            mail_from_email: std::env::var("MAIL_FROM_EMAIL")
                .unwrap_or_else(|_| "noreply@storemenu.app".into()),
            mail_from_name: std::env::var("MAIL_FROM_NAME").unwrap_or_else(|_| "Store Menu".into()),
            mail_approval_email: non_empty(std::env::var("MAIL_APPROVAL_EMAIL").ok().as_deref()),
            mail_support_email: std::env::var("MAIL_SUPPORT_EMAIL")
                .unwrap_or_else(|_| "support@storemenu.app".into()),
            approval_panel_url: std::env::var("APPROVAL_PANEL_URL")
                .unwrap_or_else(|_| "http://localhost:4200/#/admin/approvals".into()),
            dashboard_login_url: std::env::var("DASHBOARD_LOGIN_URL")
                .unwrap_or_else(|_| "http://localhost:4200/#/login".into()),
            public_menu_base_url: std::env::var("PUBLIC_MENU_BASE_URL")
                .unwrap_or_else(|_| "http://localhost/Menu".into()),
            uploads_dir: std::env::var("UPLOADS_DIR")
                .unwrap_or_else(|_| "uploads".into())
                .into(),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 5 * 1024 * 1024),
            bootstrap_admin_email: non_empty(std::env::var("BOOTSTRAP_ADMIN_EMAIL").ok().as_deref()),
            bootstrap_admin_password: std::env::var("BOOTSTRAP_ADMIN_PASSWORD")
                .ok()
                .filter(|s| !s.is_empty()),
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Public menu URL for a slug, empty when the slug is empty
    pub fn menu_url(&self, slug: &str) -> String {
        if slug.is_empty() {
            return String::new();
        }
        format!("{}/{}", self.public_menu_base_url.trim_end_matches('/'), slug)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
impl Config {
    /// Development configuration that needs no environment
    pub(crate) fn for_tests() -> Self {
        Self {
            database_url: "postgres://localhost/menu_test".into(),
            http_port: 0,
            environment: "development".into(),
            jwt_secret: "test-secret-test-secret-test-secret".into(),
            jwt_issuer: "menu_api".into(),
            jwt_ttl_secs: 3600,
            otp_ttl_secs: 300,
            otp_debug_return: false,
            mail_transport: MailTransportKind::Disabled,
            ses_region: None,
            mail_from_email: "noreply@storemenu.test".into(),
            mail_from_name: "Store Menu".into(),
            mail_approval_email: Some("approvals@storemenu.test".into()),
            mail_support_email: "support@storemenu.test".into(),
            approval_panel_url: "http://panel.test/approvals".into(),
            dashboard_login_url: "http://panel.test/login".into(),
            public_menu_base_url: "http://menu.test/Menu/".into(),
            uploads_dir: std::env::temp_dir().join("menu-cloud-test-uploads"),
            max_upload_bytes: 1024,
            bootstrap_admin_email: None,
            bootstrap_admin_password: None,
        }
    }
}

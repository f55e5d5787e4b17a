use chrono_tz::Tz;
use std::path::PathBuf;

/// Server configuration - all settings for the OS backend
///
/// # Environment variables
///
/// Every setting can be overridden through environment variables:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | /var/lib/conserta/os | Working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | Runtime environment |
/// | BUSINESS_TIMEZONE | America/Sao_Paulo | Timezone for order numbers and receipts |
/// | DEFAULT_COUNTRY_CODE | 55 | Country code prefixed to bare phone numbers |
/// | EMAIL_API_URL | (unset) | Transactional email gateway endpoint |
/// | EMAIL_API_KEY | (unset) | Email gateway credential |
/// | EMAIL_FROM | no-reply@conserta.app | Sender address for order emails |
/// | NOTIFY_BUFFER_SIZE | 1024 | Notification outbox queue capacity |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | Graceful shutdown timeout (ms) |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/conserta HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Business timezone (order-number prefix, receipt dates)
    pub timezone: Tz,
    /// Country code prefixed to destinations that lack one
    pub default_country_code: String,
    /// Transactional email gateway endpoint (unset = email disabled)
    pub email_api_url: Option<String>,
    /// Email gateway credential
    pub email_api_key: Option<String>,
    /// Sender address for order emails
    pub email_from: String,
    /// Notification outbox queue capacity
    pub notify_buffer_size: usize,
    /// Graceful shutdown timeout (ms)
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/conserta/os".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            timezone: std::env::var("BUSINESS_TIMEZONE")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(chrono_tz::America::Sao_Paulo),
            default_country_code: std::env::var("DEFAULT_COUNTRY_CODE")
                .unwrap_or_else(|_| "55".into()),
            email_api_url: std::env::var("EMAIL_API_URL").ok().filter(|v| !v.is_empty()),
            email_api_key: std::env::var("EMAIL_API_KEY").ok().filter(|v| !v.is_empty()),
            email_from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "no-reply@conserta.app".into()),
            notify_buffer_size: std::env::var("NOTIFY_BUFFER_SIZE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(1024),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
        }
    }

    /// Database directory: `{work_dir}/database`
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Ensure the working directory structure exists
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(PathBuf::from(&self.work_dir).join("logs"))?;
        Ok(())
    }

    /// Whether running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Whether running in development
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

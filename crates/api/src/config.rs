use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// A required variable is missing or a variable failed to parse.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Read `var`, falling back to `default` when unset, and parse it.
pub(crate) fn env_or<T: FromStr>(var: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = std::env::var(var).unwrap_or_else(|_| default.to_string());
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value })
}

/// Read an optional variable, treating blank values as unset.
fn env_opt(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// SQLite database URL (default: `sqlite://gestora.db`).
    pub database_url: String,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// First tenant and admin to create at startup, if configured.
    pub bootstrap: Option<BootstrapConfig>,
}

/// Tenant and admin account created on startup when absent.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub tenant_slug: String,
    pub tenant_name: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl BootstrapConfig {
    /// Bootstrap runs only when slug, email and password are all set.
    /// The tenant name defaults to the slug.
    pub fn from_env() -> Option<Self> {
        let tenant_slug = env_opt("BOOTSTRAP_TENANT_SLUG")?;
        let admin_email = env_opt("BOOTSTRAP_ADMIN_EMAIL")?;
        let admin_password = env_opt("BOOTSTRAP_ADMIN_PASSWORD")?;
        let tenant_name = env_opt("BOOTSTRAP_TENANT_NAME").unwrap_or_else(|| tenant_slug.clone());
        Some(Self {
            tenant_slug,
            tenant_name,
            admin_email,
            admin_password,
        })
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DATABASE_URL`         | `sqlite://gestora.db`      |
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_or("PORT", "3000")?;

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")?;
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://gestora.db".into());

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            jwt: JwtConfig::from_env()?,
            bootstrap: BootstrapConfig::from_env(),
        })
    }
}

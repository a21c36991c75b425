use std::env;

use auth::Authenticator;
use auth::JwtError;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub tokens: TokenConfig,
    pub cookie: CookieConfig,
    #[serde(default = "default_environment")]
    pub environment: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Signing secrets and lifetimes of the two token classes.
///
/// Lifetimes accept bare seconds (`900`) or humantime strings (`15m`, `7d`).
#[derive(Deserialize, Clone)]
pub struct TokenConfig {
    #[serde(default)]
    pub access_secret: String,
    pub access_ttl: String,
    #[serde(default)]
    pub refresh_secret: String,
    pub refresh_ttl: String,
}

// Secrets stay out of logs.
impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("access_secret", &"[REDACTED]")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_secret", &"[REDACTED]")
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CookieConfig {
    pub name: String,
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid lifetime for {key}: {reason}")]
    InvalidTtl { key: &'static str, reason: String },

    #[error("Invalid token settings: {0}")]
    Tokens(#[from] JwtError),
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    5
}

/// Parse a token lifetime. Bare digits are seconds.
pub fn parse_ttl(key: &'static str, value: &str) -> Result<chrono::Duration, ConfigurationError> {
    let value = value.trim();
    let invalid = |reason: String| ConfigurationError::InvalidTtl { key, reason };

    let duration = if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        let seconds: u64 = value.parse().map_err(|e| invalid(format!("{e}")))?;
        std::time::Duration::from_secs(seconds)
    } else {
        humantime::parse_duration(value).map_err(|e| invalid(e.to_string()))?
    };

    if duration.is_zero() {
        return Err(invalid("must be greater than zero".to_string()));
    }

    let ttl = chrono::Duration::from_std(duration).map_err(|e| invalid(e.to_string()))?;

    if chrono::Utc::now().checked_add_signed(ttl).is_none() {
        return Err(invalid("expiry would be out of range".to_string()));
    }

    Ok(ttl)
}

/// `DATABASE__URL` sets `database.url`, `TOKENS__ACCESS_TTL` sets
/// `tokens.access_ttl`.
fn environment() -> Environment {
    Environment::default().separator("__")
}

impl TokenConfig {
    /// Build the authenticator for both token classes.
    ///
    /// # Errors
    /// * `Missing` - A secret is empty
    /// * `InvalidTtl` - A lifetime cannot be parsed, is zero, or puts the expiry
    ///   out of range
    /// * `Tokens` - Secrets are identical or the refresh lifetime is not longer
    ///   than the access lifetime
    pub fn authenticator(&self) -> Result<Authenticator, ConfigurationError> {
        if self.access_secret.is_empty() {
            return Err(ConfigurationError::Missing("tokens.access_secret"));
        }
        if self.refresh_secret.is_empty() {
            return Err(ConfigurationError::Missing("tokens.refresh_secret"));
        }

        let access_ttl = parse_ttl("tokens.access_ttl", &self.access_ttl)?;
        let refresh_ttl = parse_ttl("tokens.refresh_ttl", &self.refresh_ttl)?;

        Ok(Authenticator::new(
            self.access_secret.as_bytes(),
            access_ttl,
            self.refresh_secret.as_bytes(),
            refresh_ttl,
        )?)
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Flat token variables (ACCESS_TOKEN_KEY, ACCESS_TOKEN_EXPIRE,
    ///    REFRESH_TOKEN_KEY, REFRESH_TOKEN_EXPIRE, REFRESH_TOKEN_COOKIES, NODE_ENV)
    /// 2. Environment variables (DATABASE__URL, TOKENS__ACCESS_TTL, etc.)
    /// 3. Environment-specific config file (config/{environment}.toml)
    /// 4. Default config file (config/default.toml)
    ///
    /// The result is validated; a process must not start with unusable token
    /// settings.
    pub fn load() -> Result<Self, ConfigurationError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(environment())
            .set_override_option("tokens.access_secret", env::var("ACCESS_TOKEN_KEY").ok())?
            .set_override_option("tokens.access_ttl", env::var("ACCESS_TOKEN_EXPIRE").ok())?
            .set_override_option("tokens.refresh_secret", env::var("REFRESH_TOKEN_KEY").ok())?
            .set_override_option("tokens.refresh_ttl", env::var("REFRESH_TOKEN_EXPIRE").ok())?
            .set_override_option("cookie.name", env::var("REFRESH_TOKEN_COOKIES").ok())?
            .set_override_option("environment", env::var("NODE_ENV").ok())?
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.tokens.authenticator()?;

        if self.cookie.name.trim().is_empty() {
            return Err(ConfigurationError::Missing("cookie.name"));
        }

        Ok(())
    }

    /// Refresh cookies carry the `Secure` attribute only in production.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

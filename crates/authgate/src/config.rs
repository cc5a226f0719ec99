//! Service configuration.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. an optional TOML file
//! 3. `AUTHGATE__<SECTION>__<KEY>` environment variables
//! 4. the flat variables `JWT_SECRET`, `JWT_EXPIRE_MINUTE`, `IP`, `PORT`,
//!    `USER_SERVICE_ADDR`

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::directory::ConnectPolicy;
use crate::token::TokenService;

/// Prefix for structured environment overrides.
pub const ENV_PREFIX: &str = "AUTHGATE";

/// Flat environment variables and the keys they override.
const FLAT_ENV_VARS: [(&str, &str); 5] = [
    ("JWT_SECRET", "token.secret"),
    ("JWT_EXPIRE_MINUTE", "token.expire_minutes"),
    ("IP", "server.ip"),
    ("PORT", "server.port"),
    ("USER_SERVICE_ADDR", "directory.address"),
];

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("token secret is not configured (set JWT_SECRET or token.secret)")]
    MissingSecret,

    #[error("token secret references unset environment variable {0}")]
    UnresolvedSecret(String),

    #[error("token.expire_minutes must be greater than zero")]
    InvalidTtl,

    #[error("directory.address is required in remote mode")]
    MissingDirectoryAddress,

    #[error("directory.connect_attempts must be greater than zero")]
    InvalidConnectAttempts,

    #[error("invalid listen address {0}")]
    InvalidListenAddress(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub token: TokenConfig,
    pub directory: DirectoryConfig,
    pub logging: LoggingConfig,
}

/// Listen address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "0.0.0.0".to_string(),
            port: 50051,
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = if self.ip.contains(':') {
            format!("[{}]:{}", self.ip, self.port)
        } else {
            format!("{}:{}", self.ip, self.port)
        };
        raw.parse()
            .map_err(|_| ConfigError::InvalidListenAddress(raw))
    }
}

/// Token signing settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Shared HMAC secret. `env:VAR_NAME` reads it from another variable.
    pub secret: String,
    /// Credential lifetime in minutes.
    pub expire_minutes: u64,
    /// Optional `iss` claim.
    pub issuer: Option<String>,
    /// Optional `aud` claim.
    pub audience: Vec<String>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            expire_minutes: 60,
            issuer: None,
            audience: Vec::new(),
        }
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("expire_minutes", &self.expire_minutes)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

impl TokenConfig {
    /// Resolve `env:VAR_NAME` indirection in the secret.
    fn resolve_secret(&mut self, vars: &HashMap<String, String>) -> Result<(), ConfigError> {
        if let Some(name) = self.secret.strip_prefix("env:") {
            let value = vars
                .get(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::UnresolvedSecret(name.to_string()))?;
            self.secret = value.clone();
        }
        Ok(())
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.expire_minutes.saturating_mul(60))
    }

    /// Build the token engine described by this section.
    pub fn build_service(&self) -> TokenService {
        let mut service = TokenService::new(&self.secret, self.ttl());
        if let Some(issuer) = &self.issuer {
            service = service.with_issuer(issuer.clone());
        }
        if !self.audience.is_empty() {
            service = service.with_audience(self.audience.iter().cloned());
        }
        service
    }
}

/// Which directory implementation to run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryMode {
    /// Remote `user.v1.UserService`.
    #[default]
    Remote,
    /// Fixed in-process user, for local development.
    Static,
}

/// User directory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub mode: DirectoryMode,
    pub address: String,
    pub connect_attempts: u32,
    pub connect_backoff_secs: u64,
    pub request_timeout_secs: u64,
    /// User id returned in static mode. A random id is used when unset.
    pub static_user_id: Option<String>,
    pub static_is_admin: bool,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            mode: DirectoryMode::Remote,
            address: "127.0.0.1:50052".to_string(),
            connect_attempts: crate::directory::DEFAULT_CONNECT_ATTEMPTS,
            connect_backoff_secs: crate::directory::DEFAULT_CONNECT_BACKOFF.as_secs(),
            request_timeout_secs: 5,
            static_user_id: None,
            static_is_admin: true,
        }
    }
}

impl DirectoryConfig {
    pub fn connect_policy(&self) -> ConnectPolicy {
        ConnectPolicy {
            max_attempts: self.connect_attempts,
            backoff: Duration::from_secs(self.connect_backoff_secs),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load from the process environment and an optional file.
    pub fn from_env(path: Option<&Path>) -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::load(path, &vars)
    }

    /// Load from an explicit variable set and an optional file.
    pub fn load(path: Option<&Path>, vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("token.audience")
                .source(Some(vars.clone())),
        );

        for (var, key) in FLAT_ENV_VARS {
            builder = builder.set_override_option(key, vars.get(var).cloned())?;
        }

        let mut config: AppConfig = builder.build()?.try_deserialize()?;
        config.token.resolve_secret(vars)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if self.token.expire_minutes == 0 {
            return Err(ConfigError::InvalidTtl);
        }
        if self.directory.mode == DirectoryMode::Remote && self.directory.address.trim().is_empty()
        {
            return Err(ConfigError::MissingDirectoryAddress);
        }
        if self.directory.connect_attempts == 0 {
            return Err(ConfigError::InvalidConnectAttempts);
        }
        self.server.listen_addr()?;
        Ok(())
    }
}

use std::env;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use config::builder::ConfigBuilder;
use config::builder::DefaultState;
use config::Config as ConfigSource;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub env: Env,
    pub grpc: GrpcConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Deployment profile; selects the log sink.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Env {
    Local,
    #[default]
    Prod,
}

/// Settings read by the migrator, which only touches storage.
#[derive(Debug, Deserialize, Clone)]
pub struct MigrationConfig {
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GrpcConfig {
    pub port: u16,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub token_ttl_secs: u64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

/// Argon2id cost parameters. Defaults match argon2's recommended values.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Postgres,
    Sqlite,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(rename = "type")]
    pub kind: StorageKind,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    pub sqlite: Option<SqliteConfig>,
    pub postgres: Option<PostgresConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SqliteConfig {
    pub path: String,
}

#[derive(Deserialize, Clone)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_sslmode")]
    pub sslmode: String,
}

impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("sslmode", &self.sslmode)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: "./logs/sso.log".to_string(),
        }
    }
}

/// Longest accepted token lifetime (one year).
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

fn default_timeout_secs() -> u64 {
    5
}

fn default_max_connections() -> u32 {
    5
}

fn default_sslmode() -> String {
    "prefer".to_string()
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SSO__JWT__SECRET, SSO__GRPC__PORT, etc.)
    /// 2. Profile-specific config file (config/{RUN_MODE}.toml, RUN_MODE defaults to "local")
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "local".to_string());

        let builder = ConfigSource::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Config = with_env(builder).build()?.try_deserialize()?;

        config.validate()?;

        Ok(config)
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".into()));
        }
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&self.jwt.token_ttl_secs) {
            return Err(ConfigError::Message(format!(
                "jwt.token_ttl_secs must be between 1 and {}",
                MAX_TOKEN_TTL_SECS
            )));
        }
        if self.grpc.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "grpc.timeout_secs must be at least 1".into(),
            ));
        }
        self.storage.validate()
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.jwt.token_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.grpc.timeout_secs)
    }
}

impl StorageConfig {
    /// Check that the section for the selected engine is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.kind {
            StorageKind::Postgres if self.postgres.is_none() => Err(ConfigError::Message(
                "storage.postgres section is required for type \"postgres\"".into(),
            )),
            StorageKind::Sqlite if self.sqlite.is_none() => Err(ConfigError::Message(
                "storage.sqlite section is required for type \"sqlite\"".into(),
            )),
            _ => Ok(()),
        }
    }
}

impl MigrationConfig {
    /// Load storage settings from `path`, layered over `default.toml` from the
    /// same directory and overridden by `SSO__STORAGE__*` variables.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let defaults: PathBuf = path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join("default.toml");

        let builder = ConfigSource::builder()
            .add_source(File::from(defaults).required(false))
            .add_source(File::from(path).required(true));

        let config: MigrationConfig = with_env(builder).build()?.try_deserialize()?;

        config.storage.validate()?;

        Ok(config)
    }
}

// Example: SSO__JWT__SECRET=... overrides jwt.secret
fn with_env(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("SSO")
            .separator("__")
            .try_parsing(true),
    )
}

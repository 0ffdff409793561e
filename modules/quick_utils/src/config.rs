//! Configuration for the database wrappers
//!
//! Both sections are optional so a script can configure only the store it
//! talks to. [`Config::load`] layers a YAML file under environment variables
//! prefixed with `QUICK_UTILS__`.

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Environment prefix; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "QUICK_UTILS__";

/// Configuration loading failure
#[derive(Debug, thiserror::Error)]
#[error("failed to load configuration: {0}")]
pub struct ConfigError(#[from] figment::Error);

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Relational store connection
    #[serde(default)]
    pub mysql: Option<MysqlConfig>,

    /// Column store connection
    #[serde(default)]
    pub cassandra: Option<CassandraConfig>,
}

impl Config {
    /// Load from a YAML file, then apply `QUICK_UTILS__*` environment overrides
    ///
    /// A missing file is not an error; the environment alone may configure
    /// everything.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let cfg = Figment::new()
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(cfg)
    }
}

/// MySQL connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MysqlConfig {
    pub host: String,

    /// Database (schema) name
    #[serde(alias = "db")]
    pub database: String,

    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_mysql_port")]
    pub port: u16,
}

impl MysqlConfig {
    pub fn new(
        host: impl Into<String>,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            database: database.into(),
            user: user.into(),
            password: password.into(),
            port: default_mysql_port(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

/// Cassandra connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CassandraConfig {
    /// Contact points; a host may carry its own `:port`
    pub hosts: Vec<String>,

    pub keyspace: String,

    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_cassandra_port")]
    pub port: u16,

    /// Consistency level name, validated when connecting
    #[serde(default = "default_consistency_level")]
    pub consistency_level: String,

    /// Per-request timeout
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl CassandraConfig {
    pub fn new(
        hosts: impl IntoIterator<Item = impl Into<String>>,
        keyspace: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
            keyspace: keyspace.into(),
            user: user.into(),
            password: password.into(),
            port: default_cassandra_port(),
            consistency_level: default_consistency_level(),
            timeout: default_timeout(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_consistency_level(mut self, level: impl Into<String>) -> Self {
        self.consistency_level = level.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn default_mysql_port() -> u16 {
    3306
}

fn default_cassandra_port() -> u16 {
    9042
}

fn default_consistency_level() -> String {
    "QUORUM".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

//! Common test utilities and live-server settings
#![allow(dead_code)]

use quick_utils::{CassandraConfig, MysqlConfig};
use std::sync::Once;
use testcontainers_modules::mysql::Mysql;
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::testcontainers::ContainerAsync;

static TRACING: Once = Once::new();

/// Route crate logs to the test harness; filter with `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// MySQL server a test talks to; a started container lives as long as this
pub struct MysqlServer {
    pub config: MysqlConfig,
    _container: Option<ContainerAsync<Mysql>>,
}

/// Server for the MySQL wrapper tests
///
/// With `TEST_MYSQL_HOST` set the tests use that server (see
/// [`live_mysql_config`]). Otherwise a throwaway MySQL container is started;
/// `None` means docker is unavailable and the caller skips.
pub async fn mysql_server() -> Option<MysqlServer> {
    if std::env::var("TEST_MYSQL_HOST").is_ok() {
        return Some(MysqlServer {
            config: live_mysql_config(),
            _container: None,
        });
    }

    let container = match Mysql::default().start().await {
        Ok(container) => container,
        Err(e) => {
            println!("⏭️  SKIPPED: cannot start MySQL container: {}", e);
            return None;
        }
    };
    let host = container.get_host().await.ok()?.to_string();
    let port = container.get_host_port_ipv4(3306).await.ok()?;

    // the image creates database `test` with a password-less root
    Some(MysqlServer {
        config: MysqlConfig::new(host, "test", "root", "").with_port(port),
        _container: Some(container),
    })
}

/// MySQL server given through the environment
///
/// Reads `TEST_MYSQL_HOST`, `TEST_MYSQL_PORT`, `TEST_MYSQL_DATABASE`,
/// `TEST_MYSQL_USER` and `TEST_MYSQL_PASSWORD`.
pub fn live_mysql_config() -> MysqlConfig {
    let port = env_or("TEST_MYSQL_PORT", "3306").parse().unwrap_or(3306);
    MysqlConfig::new(
        env_or("TEST_MYSQL_HOST", "127.0.0.1"),
        env_or("TEST_MYSQL_DATABASE", "test"),
        env_or("TEST_MYSQL_USER", "root"),
        env_or("TEST_MYSQL_PASSWORD", "root"),
    )
    .with_port(port)
}

/// Cassandra cluster used by the `#[ignore]`d live tests
///
/// Reads `TEST_CASSANDRA_HOSTS` (comma separated), `TEST_CASSANDRA_KEYSPACE`,
/// `TEST_CASSANDRA_USER` and `TEST_CASSANDRA_PASSWORD`. The keyspace must
/// already exist.
pub fn live_cassandra_config() -> CassandraConfig {
    let hosts: Vec<String> = env_or("TEST_CASSANDRA_HOSTS", "127.0.0.1")
        .split(',')
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect();
    CassandraConfig::new(
        hosts,
        env_or("TEST_CASSANDRA_KEYSPACE", "quick_utils_test"),
        env_or("TEST_CASSANDRA_USER", "cassandra"),
        env_or("TEST_CASSANDRA_PASSWORD", "cassandra"),
    )
    .with_consistency_level("ONE")
}

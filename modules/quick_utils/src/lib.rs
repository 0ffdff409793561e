//! Quick Utils
//!
//! Helpers for throwaway scripts and test fixtures: random addresses, serial
//! numbers and dates, a JSON file loader, and thin single-connection wrappers
//! around the MySQL (`sqlx`) and Cassandra (`scylla`) drivers.

// Public exports
pub mod contract;
pub use contract::{ConsistencyLevel, Record, UtilsError};

pub mod config;
pub use config::{CassandraConfig, Config, ConfigError, MysqlConfig};

pub mod domain;
pub use domain::{repeat_in_query_placeholders, DataGenerator, DEFAULT_OUIS};

pub mod infra;
pub use infra::{
    load_json_file, load_json_file_as, CassandraConnect, CassandraError, JsonFileError,
    MysqlConnect, MysqlError,
};

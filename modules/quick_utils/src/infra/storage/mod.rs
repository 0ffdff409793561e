//! Storage layer - database wrappers and row mappers

pub mod cassandra;
pub mod mapper;
pub mod mysql;

pub use cassandra::{CassandraConnect, CassandraError};
pub use mysql::{MysqlConnect, MysqlError};

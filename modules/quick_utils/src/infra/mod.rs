//! Infrastructure layer - file and database I/O

pub mod json_file;
pub mod storage;

pub use json_file::{load_json_file, load_json_file_as, JsonFileError};
pub use storage::{CassandraConnect, CassandraError, MysqlConnect, MysqlError};

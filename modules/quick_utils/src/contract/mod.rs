//! Contract layer - public types shared across the crate
//!
//! Nothing here depends on a database driver.

pub mod error;
pub mod model;

pub use error::UtilsError;
pub use model::{ConsistencyLevel, Record};

//! Domain layer - pure helpers with no I/O

pub mod generators;
pub mod sql;
pub mod validation;

pub use generators::{DataGenerator, DEFAULT_OUIS, PRIVATE_RANGES, SERIAL_MAX, SERIAL_MIN};
pub use sql::{placeholders, repeat_in_query_placeholders};

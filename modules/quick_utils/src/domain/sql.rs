//! SQL text helpers

/// Positional bind marker understood by the MySQL driver
pub const PLACEHOLDER: &str = "?";

/// `count` placeholders joined with `", "`, for building `IN (...)` lists
pub fn placeholders(count: usize) -> String {
    vec![PLACEHOLDER; count].join(", ")
}

/// One placeholder per item of `items`
pub fn repeat_in_query_placeholders<T>(items: &[T]) -> String {
    placeholders(items.len())
}

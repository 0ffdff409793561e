//! Contract models shared by both database wrappers
//!
//! Driver rows are normalized into [`Record`] so MySQL and Cassandra results
//! look the same to callers.

use super::error::UtilsError;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A single result row with its columns in select order
///
/// Values can be looked up by column name or by position, and the record
/// serializes as a JSON object keeping the column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record with room for `capacity` columns
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Append a column. Duplicate names are kept; lookups return the first.
    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        self.columns.push(column.into());
        self.values.push(value);
    }

    /// Value of the named column
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.values.get(idx))
    }

    /// Value at the given position
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Column names in select order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values in select order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(column, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Consume the record, keeping only the values
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Consume the record into a JSON object
    pub fn into_map(self) -> Map<String, Value> {
        let mut map = Map::with_capacity(self.columns.len());
        for (column, value) in self.columns.into_iter().zip(self.values) {
            map.entry(column).or_insert(value);
        }
        map
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.push(column, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Same view as `get`: only the first of a duplicated column is written
        let entries: Vec<(&str, &Value)> = self
            .iter()
            .enumerate()
            .filter(|(idx, (column, _))| !self.columns[..*idx].iter().any(|c| c == column))
            .map(|(_, entry)| entry)
            .collect();

        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (column, value) in entries {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Cassandra consistency level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConsistencyLevel {
    Any,
    One,
    Two,
    Three,
    #[default]
    Quorum,
    All,
    LocalQuorum,
    EachQuorum,
    Serial,
    LocalSerial,
    LocalOne,
}

impl ConsistencyLevel {
    /// Every level, in protocol order
    pub const ALL_LEVELS: [ConsistencyLevel; 11] = [
        Self::Any,
        Self::One,
        Self::Two,
        Self::Three,
        Self::Quorum,
        Self::All,
        Self::LocalQuorum,
        Self::EachQuorum,
        Self::Serial,
        Self::LocalSerial,
        Self::LocalOne,
    ];

    /// Canonical upper-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::One => "ONE",
            Self::Two => "TWO",
            Self::Three => "THREE",
            Self::Quorum => "QUORUM",
            Self::All => "ALL",
            Self::LocalQuorum => "LOCAL_QUORUM",
            Self::EachQuorum => "EACH_QUORUM",
            Self::Serial => "SERIAL",
            Self::LocalSerial => "LOCAL_SERIAL",
            Self::LocalOne => "LOCAL_ONE",
        }
    }
}

impl fmt::Display for ConsistencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsistencyLevel {
    type Err = UtilsError;

    /// Names are matched case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL_LEVELS
            .iter()
            .copied()
            .find(|level| level.as_str() == upper)
            .ok_or_else(|| UtilsError::InvalidConsistencyLevel {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Record {
        vec![
            ("name", json!("alice")),
            ("age", json!(31)),
            ("email", Value::Null),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_record_lookup_by_name_and_index() {
        let record = sample();
        assert_eq!(record.len(), 3);
        assert_eq!(record.get("name"), Some(&json!("alice")));
        assert_eq!(record.get_index(1), Some(&json!(31)));
        assert_eq!(record.get("missing"), None);
        assert_eq!(record.get_index(3), None);
    }

    #[test]
    fn test_record_serializes_in_column_order() {
        let encoded = serde_json::to_string(&sample()).unwrap();
        assert_eq!(encoded, r#"{"name":"alice","age":31,"email":null}"#);
    }

    #[test]
    fn test_record_duplicate_columns_keep_first() {
        let mut record = Record::new();
        record.push("id", json!(1));
        record.push("id", json!(2));
        assert_eq!(record.get("id"), Some(&json!(1)));
        assert_eq!(record.into_map().get("id"), Some(&json!(1)));
    }

    #[test]
    fn test_record_serializes_duplicate_columns_once() {
        let mut record = Record::new();
        record.push("id", json!(1));
        record.push("name", json!("edge"));
        record.push("id", json!(2));

        let encoded = serde_json::to_string(&record).unwrap();
        assert_eq!(encoded, r#"{"id":1,"name":"edge"}"#);
        assert_eq!(serde_json::to_value(&record).unwrap(), Value::Object(record.clone().into_map()));
    }

    #[test]
    fn test_consistency_parse_case_insensitive() {
        assert_eq!("quorum".parse::<ConsistencyLevel>().unwrap(), ConsistencyLevel::Quorum);
        assert_eq!("Local_One".parse::<ConsistencyLevel>().unwrap(), ConsistencyLevel::LocalOne);
        assert_eq!("EACH_QUORUM".parse::<ConsistencyLevel>().unwrap(), ConsistencyLevel::EachQuorum);
    }

    #[test]
    fn test_consistency_names_round_trip() {
        for level in ConsistencyLevel::ALL_LEVELS {
            assert_eq!(level.to_string().parse::<ConsistencyLevel>().unwrap(), level);
        }
    }

    #[test]
    fn test_consistency_rejects_unknown() {
        let err = "MOSTLY".parse::<ConsistencyLevel>().unwrap_err();
        assert_eq!(err, UtilsError::InvalidConsistencyLevel { name: "MOSTLY".to_string() });
        assert!("".parse::<ConsistencyLevel>().is_err());
        assert!("LOCAL QUORUM".parse::<ConsistencyLevel>().is_err());
    }

    #[test]
    fn test_consistency_default_is_quorum() {
        assert_eq!(ConsistencyLevel::default(), ConsistencyLevel::Quorum);
    }
}

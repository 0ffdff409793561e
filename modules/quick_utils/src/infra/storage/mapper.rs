//! Driver value to contract model mappers
//!
//! Conversions between driver rows/values and [`Record`] / JSON, plus the
//! JSON-to-bind-argument conversion used by the MySQL wrapper.

use crate::contract::Record;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use scylla::frame::response::result::{ColumnSpec, CqlValue, Row as CqlRow};
use serde_json::{Map, Value};
use sqlx::mysql::{MySqlArguments, MySqlRow};
use sqlx::{Arguments, Column, Row, TypeInfo, ValueRef};

// ===== MySQL Conversions =====

/// Bind JSON values positionally
///
/// Arrays and objects are bound as their JSON text.
pub fn mysql_arguments(params: &[Value]) -> Result<MySqlArguments, sqlx::Error> {
    let mut args = MySqlArguments::default();
    for param in params {
        let added = match param {
            Value::Null => args.add(None::<String>),
            Value::Bool(b) => args.add(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    args.add(i)
                } else if let Some(u) = n.as_u64() {
                    args.add(u)
                } else {
                    args.add(n.as_f64())
                }
            }
            Value::String(s) => args.add(s.clone()),
            other => args.add(other.to_string()),
        };
        added.map_err(sqlx::Error::Encode)?;
    }
    Ok(args)
}

/// Decode every column of a MySQL row into a [`Record`]
pub fn record_from_mysql_row(row: &MySqlRow) -> Result<Record, sqlx::Error> {
    let mut record = Record::with_capacity(row.len());
    for column in row.columns() {
        let value = mysql_column_to_json(row, column.ordinal(), column.type_info().name())?;
        record.push(column.name(), value);
    }
    Ok(record)
}

fn mysql_column_to_json(row: &MySqlRow, idx: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(idx)?.is_null() {
        return Ok(Value::Null);
    }

    let value = match type_name {
        "BOOLEAN" => Value::Bool(row.try_get::<bool, _>(idx)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            Value::from(row.try_get::<i64, _>(idx)?)
        }
        unsigned if unsigned.ends_with(" UNSIGNED") => Value::from(row.try_get::<u64, _>(idx)?),
        "FLOAT" => Value::from(f64::from(row.try_get::<f32, _>(idx)?)),
        "DOUBLE" => Value::from(row.try_get::<f64, _>(idx)?),
        "DECIMAL" => Value::String(row.try_get::<Decimal, _>(idx)?.to_string()),
        "DATE" => Value::String(row.try_get::<NaiveDate, _>(idx)?.to_string()),
        "TIME" => Value::String(row.try_get::<NaiveTime, _>(idx)?.to_string()),
        "DATETIME" => Value::String(
            row.try_get::<NaiveDateTime, _>(idx)?
                .format("%Y-%m-%dT%H:%M:%S%.f")
                .to_string(),
        ),
        "TIMESTAMP" => Value::String(
            row.try_get::<DateTime<Utc>, _>(idx)?
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
        ),
        "JSON" => row.try_get::<Value, _>(idx)?,
        "YEAR" => Value::from(row.try_get_unchecked::<u16, _>(idx)?),
        "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BINARY" | "VARBINARY" => {
            Value::String(hex::encode(row.try_get::<Vec<u8>, _>(idx)?))
        }
        // the driver's byte decoder refuses these types, the raw bytes are still valid
        "BIT" | "GEOMETRY" => Value::String(hex::encode(row.try_get_unchecked::<Vec<u8>, _>(idx)?)),
        _ => mysql_column_as_text(row, idx)?,
    };

    Ok(value)
}

// Text columns, enums, sets and anything the driver labels unusually
fn mysql_column_as_text(row: &MySqlRow, idx: usize) -> Result<Value, sqlx::Error> {
    match row.try_get::<String, _>(idx) {
        Ok(s) => Ok(Value::String(s)),
        Err(_) => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(idx)?;
            Ok(Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        }
    }
}

// ===== CQL Conversions =====

/// Pair a Cassandra row with its column names
///
/// Columns without a spec fall back to their position as the name.
pub fn record_from_cql_row(col_specs: &[ColumnSpec], row: CqlRow) -> Record {
    let mut record = Record::with_capacity(row.columns.len());
    for (idx, value) in row.columns.into_iter().enumerate() {
        let name = col_specs
            .get(idx)
            .map(|spec| spec.name.clone())
            .unwrap_or_else(|| idx.to_string());
        record.push(name, optional_cql_to_json(value));
    }
    record
}

/// Convert one CQL value into JSON
pub fn cql_to_json(value: CqlValue) -> Value {
    match value {
        CqlValue::Ascii(s) | CqlValue::Text(s) => Value::String(s),
        CqlValue::Boolean(b) => Value::Bool(b),
        CqlValue::TinyInt(v) => Value::from(v),
        CqlValue::SmallInt(v) => Value::from(v),
        CqlValue::Int(v) => Value::from(v),
        CqlValue::BigInt(v) => Value::from(v),
        CqlValue::Counter(c) => Value::from(c.0),
        CqlValue::Float(v) => Value::from(f64::from(v)),
        CqlValue::Double(v) => Value::from(v),
        CqlValue::Blob(bytes) => Value::String(hex::encode(bytes)),
        CqlValue::Uuid(uuid) => Value::String(uuid.to_string()),
        CqlValue::Inet(ip) => Value::String(ip.to_string()),
        CqlValue::Timestamp(ts) => timestamp_to_json(ts.0),
        CqlValue::Date(date) => date_to_json(date.0),
        CqlValue::List(items) | CqlValue::Set(items) => {
            Value::Array(items.into_iter().map(cql_to_json).collect())
        }
        CqlValue::Tuple(items) => Value::Array(items.into_iter().map(optional_cql_to_json).collect()),
        CqlValue::Map(entries) => map_to_json(entries),
        CqlValue::UserDefinedType { fields, .. } => Value::Object(
            fields
                .into_iter()
                .map(|(name, value)| (name, optional_cql_to_json(value)))
                .collect(),
        ),
        CqlValue::Empty => Value::Null,
        other => Value::String(format!("{:?}", other)),
    }
}

fn optional_cql_to_json(value: Option<CqlValue>) -> Value {
    value.map(cql_to_json).unwrap_or(Value::Null)
}

// Milliseconds since the Unix epoch
fn timestamp_to_json(millis: i64) -> Value {
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(dt) => Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
        None => Value::from(millis),
    }
}

// CQL dates count days with the Unix epoch at 2^31
fn date_to_json(raw: u32) -> Value {
    let days = i64::from(raw) - (1i64 << 31);
    match DateTime::<Utc>::from_timestamp(days * 86_400, 0) {
        Some(dt) => Value::String(dt.date_naive().to_string()),
        None => Value::from(days),
    }
}

// Text-keyed maps become objects; anything else a list of [key, value] pairs
fn map_to_json(entries: Vec<(CqlValue, CqlValue)>) -> Value {
    let text_keys = entries
        .iter()
        .all(|(k, _)| matches!(k, CqlValue::Text(_) | CqlValue::Ascii(_)));

    if text_keys {
        let mut map = Map::with_capacity(entries.len());
        for (key, value) in entries {
            if let CqlValue::Text(k) | CqlValue::Ascii(k) = key {
                map.insert(k, cql_to_json(value));
            }
        }
        Value::Object(map)
    } else {
        Value::Array(
            entries
                .into_iter()
                .map(|(k, v)| Value::Array(vec![cql_to_json(k), cql_to_json(v)]))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scylla::frame::value::{Counter, CqlDate, CqlTimestamp};
    use serde_json::json;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_scalars() {
        assert_eq!(cql_to_json(CqlValue::Text("hi".into())), json!("hi"));
        assert_eq!(cql_to_json(CqlValue::Ascii("a".into())), json!("a"));
        assert_eq!(cql_to_json(CqlValue::Boolean(true)), json!(true));
        assert_eq!(cql_to_json(CqlValue::TinyInt(-3)), json!(-3));
        assert_eq!(cql_to_json(CqlValue::Int(42)), json!(42));
        assert_eq!(cql_to_json(CqlValue::BigInt(1 << 40)), json!(1i64 << 40));
        assert_eq!(cql_to_json(CqlValue::Counter(Counter(7))), json!(7));
        assert_eq!(cql_to_json(CqlValue::Double(1.5)), json!(1.5));
        assert_eq!(cql_to_json(CqlValue::Empty), Value::Null);
    }

    #[test]
    fn test_blob_and_inet() {
        assert_eq!(cql_to_json(CqlValue::Blob(vec![0xde, 0xad, 0x01])), json!("dead01"));
        let ip = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20));
        assert_eq!(cql_to_json(CqlValue::Inet(ip)), json!("192.168.1.20"));
    }

    #[test]
    fn test_timestamp_and_date() {
        assert_eq!(
            cql_to_json(CqlValue::Timestamp(CqlTimestamp(0))),
            json!("1970-01-01T00:00:00.000Z")
        );
        assert_eq!(
            cql_to_json(CqlValue::Timestamp(CqlTimestamp(1_700_000_000_123))),
            json!("2023-11-14T22:13:20.123Z")
        );
        assert_eq!(cql_to_json(CqlValue::Date(CqlDate(1 << 31))), json!("1970-01-01"));
        assert_eq!(cql_to_json(CqlValue::Date(CqlDate((1 << 31) + 365))), json!("1971-01-01"));
    }

    #[test]
    fn test_collections() {
        let list = CqlValue::List(vec![CqlValue::Int(1), CqlValue::Int(2)]);
        assert_eq!(cql_to_json(list), json!([1, 2]));

        let tuple = CqlValue::Tuple(vec![Some(CqlValue::Text("x".into())), None]);
        assert_eq!(cql_to_json(tuple), json!(["x", null]));
    }

    #[test]
    fn test_text_keyed_map_becomes_object() {
        let map = CqlValue::Map(vec![
            (CqlValue::Text("eth0".into()), CqlValue::Int(1500)),
            (CqlValue::Text("lo".into()), CqlValue::Int(65536)),
        ]);
        assert_eq!(cql_to_json(map), json!({"eth0": 1500, "lo": 65536}));
    }

    #[test]
    fn test_non_text_keyed_map_becomes_pairs() {
        let map = CqlValue::Map(vec![(CqlValue::Int(1), CqlValue::Text("one".into()))]);
        assert_eq!(cql_to_json(map), json!([[1, "one"]]));
    }

    #[test]
    fn test_udt_fields() {
        let udt = CqlValue::UserDefinedType {
            keyspace: "ks".into(),
            type_name: "address".into(),
            fields: vec![
                ("street".into(), Some(CqlValue::Text("Main".into()))),
                ("zip".into(), None),
            ],
        };
        assert_eq!(cql_to_json(udt), json!({"street": "Main", "zip": null}));
    }

    #[test]
    fn test_row_without_specs_uses_positions() {
        let row = CqlRow {
            columns: vec![Some(CqlValue::Int(1)), None],
        };
        let record = record_from_cql_row(&[], row);
        assert_eq!(record.columns(), &["0".to_string(), "1".to_string()]);
        assert_eq!(record.get("0"), Some(&json!(1)));
        assert_eq!(record.get_index(1), Some(&Value::Null));
    }

    #[test]
    fn test_mysql_arguments_accepts_all_json_kinds() {
        let params = vec![
            Value::Null,
            json!(true),
            json!(-5),
            json!(u64::MAX),
            json!(2.25),
            json!("text"),
            json!([1, 2]),
            json!({"k": "v"}),
        ];
        assert!(mysql_arguments(&params).is_ok());
        assert!(mysql_arguments(&[]).is_ok());
    }
}

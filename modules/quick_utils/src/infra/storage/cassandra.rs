//! Cassandra / ScyllaDB session wrapper
//!
//! Opens one authenticated session whose default execution profile carries
//! the configured consistency level and request timeout. Driver errors are
//! returned to the caller as they are; the only check done here is the
//! consistency level name.

use crate::config::CassandraConfig;
use crate::contract::{ConsistencyLevel, Record};
use crate::domain::validation;
use scylla::batch::{Batch, BatchType};
use scylla::cql_to_rust::{FromRow, FromRowError};
use scylla::query::Query;
use scylla::serialize::batch::BatchValues;
use scylla::serialize::row::SerializeRow;
use scylla::statement::Consistency;
use scylla::transport::errors::{NewSessionError, QueryError};
use scylla::{ExecutionProfile, QueryResult, Session, SessionBuilder};
use std::time::Duration;

use super::mapper;

/// Error type for Cassandra operations
#[derive(Debug, thiserror::Error)]
pub enum CassandraError {
    #[error("invalid consistency level passed to Cassandra: {0}")]
    InvalidConsistencyLevel(String),

    #[error("no Cassandra contact points configured")]
    NoContactPoints,

    #[error("Failed to open Cassandra session: {0}")]
    Connect(#[from] NewSessionError),

    #[error("CQL request failed: {0}")]
    Query(#[from] QueryError),

    #[error("Failed to decode row: {0}")]
    Decode(#[from] FromRowError),
}

/// Thin wrapper around one Cassandra session
pub struct CassandraConnect {
    session: Session,
    keyspace: String,
    consistency: ConsistencyLevel,
    timeout: Duration,
}

impl std::fmt::Debug for CassandraConnect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CassandraConnect")
            .field("keyspace", &self.keyspace)
            .field("consistency", &self.consistency)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl CassandraConnect {
    /// Validate the settings and open the session
    pub async fn connect(config: &CassandraConfig) -> Result<Self, CassandraError> {
        let consistency: ConsistencyLevel = config
            .consistency_level
            .parse()
            .map_err(|_| CassandraError::InvalidConsistencyLevel(config.consistency_level.clone()))?;

        if config.hosts.is_empty() {
            return Err(CassandraError::NoContactPoints);
        }

        let nodes: Vec<String> = config
            .hosts
            .iter()
            .map(|host| validation::contact_point(host, config.port))
            .collect();

        let profile = ExecutionProfile::builder()
            .consistency(driver_consistency(consistency))
            .request_timeout(Some(config.timeout))
            .build();

        tracing::info!(
            nodes = ?nodes,
            keyspace = %config.keyspace,
            consistency = %consistency,
            "Connecting to Cassandra"
        );

        let session = SessionBuilder::new()
            .known_nodes(&nodes)
            .user(config.user.as_str(), config.password.as_str())
            .default_execution_profile_handle(profile.into_handle())
            .use_keyspace(config.keyspace.as_str(), false)
            .build()
            .await?;

        Ok(Self {
            session,
            keyspace: config.keyspace.clone(),
            consistency,
            timeout: config.timeout,
        })
    }

    /// Run a statement; `true` when the result carries at least one row
    pub async fn statement(
        &self,
        cql: impl Into<Query>,
        values: impl SerializeRow,
    ) -> Result<bool, CassandraError> {
        let result = self.query(cql, values).await?;
        Ok(has_rows(&result))
    }

    /// Run a batch built with [`get_batch`](Self::get_batch)
    pub async fn execute_batch(
        &self,
        batch: &Batch,
        values: impl BatchValues,
    ) -> Result<bool, CassandraError> {
        tracing::debug!("Executing CQL batch");
        let result = self.session.batch(batch, values).await?;
        Ok(has_rows(&result))
    }

    /// Empty logged batch at the session's consistency level
    pub fn get_batch(&self) -> Batch {
        let mut batch = Batch::new(BatchType::Logged);
        batch.set_consistency(driver_consistency(self.consistency));
        batch
    }

    /// First row, or `None` when the result has no rows
    pub async fn get(
        &self,
        cql: impl Into<Query>,
        values: impl SerializeRow,
    ) -> Result<Option<Record>, CassandraError> {
        let result = self.query(cql, values).await?;
        Ok(into_records(result).into_iter().next())
    }

    /// Every row of the result
    pub async fn select(
        &self,
        cql: impl Into<Query>,
        values: impl SerializeRow,
    ) -> Result<Vec<Record>, CassandraError> {
        let result = self.query(cql, values).await?;
        Ok(into_records(result))
    }

    /// First row decoded into `T`
    pub async fn get_as<T: FromRow>(
        &self,
        cql: impl Into<Query>,
        values: impl SerializeRow,
    ) -> Result<Option<T>, CassandraError> {
        let result = self.query(cql, values).await?;
        let first = result.rows.and_then(|rows| rows.into_iter().next());
        Ok(first.map(|row| row.into_typed::<T>()).transpose()?)
    }

    /// Every row decoded into `T`
    pub async fn select_as<T: FromRow>(
        &self,
        cql: impl Into<Query>,
        values: impl SerializeRow,
    ) -> Result<Vec<T>, CassandraError> {
        let result = self.query(cql, values).await?;
        Ok(result
            .rows
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_typed::<T>())
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// `USE` another keyspace for every following request
    pub async fn switch_keyspace(&mut self, keyspace: &str) -> Result<(), CassandraError> {
        self.session.use_keyspace(keyspace, false).await?;
        tracing::info!(from = %self.keyspace, to = %keyspace, "Switched Cassandra keyspace");
        self.keyspace = keyspace.to_string();
        Ok(())
    }

    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    pub fn consistency(&self) -> ConsistencyLevel {
        self.consistency
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Raw driver session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Shut the session down
    pub fn close(self) {
        tracing::info!(keyspace = %self.keyspace, "Closing Cassandra session");
        drop(self.session);
    }

    async fn query(
        &self,
        cql: impl Into<Query>,
        values: impl SerializeRow,
    ) -> Result<QueryResult, CassandraError> {
        let query: Query = cql.into();
        tracing::debug!(cql = %query.contents, "Executing CQL");
        Ok(self.session.query(query, values).await?)
    }
}

/// Driver value for a consistency level
pub fn driver_consistency(level: ConsistencyLevel) -> Consistency {
    match level {
        ConsistencyLevel::Any => Consistency::Any,
        ConsistencyLevel::One => Consistency::One,
        ConsistencyLevel::Two => Consistency::Two,
        ConsistencyLevel::Three => Consistency::Three,
        ConsistencyLevel::Quorum => Consistency::Quorum,
        ConsistencyLevel::All => Consistency::All,
        ConsistencyLevel::LocalQuorum => Consistency::LocalQuorum,
        ConsistencyLevel::EachQuorum => Consistency::EachQuorum,
        ConsistencyLevel::Serial => Consistency::Serial,
        ConsistencyLevel::LocalSerial => Consistency::LocalSerial,
        ConsistencyLevel::LocalOne => Consistency::LocalOne,
    }
}

fn has_rows(result: &QueryResult) -> bool {
    result.rows.as_ref().is_some_and(|rows| !rows.is_empty())
}

fn into_records(mut result: QueryResult) -> Vec<Record> {
    let rows = result.rows.take().unwrap_or_default();
    let specs = &result.col_specs;
    rows.into_iter()
        .map(|row| mapper::record_from_cql_row(specs, row))
        .collect()
}

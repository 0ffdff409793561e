//! MySQL connection wrapper
//!
//! Holds a single, non-pooled connection. Every operation swallows driver
//! errors: the failure is logged, stored as the last error, and the caller
//! gets `false` / `None` back.

use crate::config::MysqlConfig;
use crate::contract::Record;
use serde_json::Value;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Connection, FromRow};

use super::mapper;

/// Error type for MySQL operations
#[derive(Debug, thiserror::Error)]
pub enum MysqlError {
    #[error("Failed to connect to MySQL at {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("MySQL query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// Thin wrapper around one MySQL connection
pub struct MysqlConnect {
    connection: MySqlConnection,
    options: MySqlConnectOptions,
    endpoint: String,
    last_error: Option<MysqlError>,
}

impl std::fmt::Debug for MysqlConnect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MysqlConnect")
            .field("endpoint", &self.endpoint)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

impl MysqlConnect {
    /// Open the connection
    ///
    /// Unlike the query methods, a connection failure is returned to the
    /// caller.
    pub async fn connect(config: &MysqlConfig) -> Result<Self, MysqlError> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .password(&config.password);
        let endpoint = format!("{}:{}", config.host, config.port);

        let connection = MySqlConnection::connect_with(&options)
            .await
            .map_err(|source| MysqlError::Connect {
                endpoint: endpoint.clone(),
                source,
            })?;

        tracing::info!(endpoint = %endpoint, database = %config.database, "Connected to MySQL");

        Ok(Self {
            connection,
            options,
            endpoint,
            last_error: None,
        })
    }

    /// Execute `sql` in its own transaction and commit
    ///
    /// Returns `true` when at least one row was affected. Statements that
    /// only read, such as `SELECT`, affect no rows and always give `false`;
    /// use [`get`](Self::get) or [`select`](Self::select) for those.
    pub async fn statement(&mut self, sql: &str, params: &[Value]) -> bool {
        let outcome = self.try_statement(sql, params).await;
        self.settle("statement", outcome)
            .map(|affected| affected > 0)
            .unwrap_or(false)
    }

    /// First row of the result, `None` when empty or on error
    pub async fn get(&mut self, sql: &str, params: &[Value]) -> Option<Record> {
        let outcome = self.try_get(sql, params).await;
        self.settle("get", outcome).flatten()
    }

    /// All rows of the result, `None` on error
    pub async fn select(&mut self, sql: &str, params: &[Value]) -> Option<Vec<Record>> {
        let outcome = self.try_select(sql, params).await;
        self.settle("select", outcome)
    }

    /// First row decoded into `T`
    pub async fn get_as<T>(&mut self, sql: &str, params: &[Value]) -> Option<T>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        let outcome = self.try_get_as(sql, params).await;
        self.settle("get_as", outcome).flatten()
    }

    /// All rows decoded into `T`
    pub async fn select_as<T>(&mut self, sql: &str, params: &[Value]) -> Option<Vec<T>>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        let outcome = self.try_select_as(sql, params).await;
        self.settle("select_as", outcome)
    }

    /// Ping the server
    ///
    /// With `reconnect`, a failed ping reopens the connection using the
    /// options it was first opened with and succeeds if that works.
    pub async fn health_check(&mut self, reconnect: bool) -> bool {
        let outcome = self.try_health_check(reconnect).await;
        self.settle("health_check", outcome).is_some()
    }

    /// Most recent swallowed error; successful calls do not clear it
    pub fn last_error(&self) -> Option<&MysqlError> {
        self.last_error.as_ref()
    }

    /// Raw driver connection
    pub fn connection(&mut self) -> &mut MySqlConnection {
        &mut self.connection
    }

    /// `host:port` this wrapper connects to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Close the connection gracefully
    pub async fn close(self) -> Result<(), MysqlError> {
        self.connection.close().await?;
        tracing::info!(endpoint = %self.endpoint, "Closed MySQL connection");
        Ok(())
    }

    // ===== Fallible operations =====

    async fn try_statement(&mut self, sql: &str, params: &[Value]) -> Result<u64, MysqlError> {
        tracing::debug!(sql, params = params.len(), "Executing MySQL statement");
        let args = mapper::mysql_arguments(params)?;

        let mut tx = self.connection.begin().await?;
        let result = sqlx::query_with(sql, args).execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(result.rows_affected())
    }

    async fn try_get(&mut self, sql: &str, params: &[Value]) -> Result<Option<Record>, MysqlError> {
        tracing::debug!(sql, params = params.len(), "Fetching one MySQL row");
        let args = mapper::mysql_arguments(params)?;
        let row = sqlx::query_with(sql, args)
            .fetch_optional(&mut self.connection)
            .await?;

        Ok(row.as_ref().map(mapper::record_from_mysql_row).transpose()?)
    }

    async fn try_select(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Record>, MysqlError> {
        tracing::debug!(sql, params = params.len(), "Fetching all MySQL rows");
        let args = mapper::mysql_arguments(params)?;
        let rows = sqlx::query_with(sql, args)
            .fetch_all(&mut self.connection)
            .await?;

        Ok(rows
            .iter()
            .map(mapper::record_from_mysql_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn try_get_as<T>(&mut self, sql: &str, params: &[Value]) -> Result<Option<T>, MysqlError>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        let args = mapper::mysql_arguments(params)?;
        Ok(sqlx::query_as_with::<_, T, _>(sql, args)
            .fetch_optional(&mut self.connection)
            .await?)
    }

    async fn try_select_as<T>(&mut self, sql: &str, params: &[Value]) -> Result<Vec<T>, MysqlError>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        let args = mapper::mysql_arguments(params)?;
        Ok(sqlx::query_as_with::<_, T, _>(sql, args)
            .fetch_all(&mut self.connection)
            .await?)
    }

    async fn try_health_check(&mut self, reconnect: bool) -> Result<(), MysqlError> {
        match self.connection.ping().await {
            Ok(()) => Ok(()),
            Err(err) if reconnect => {
                tracing::info!(endpoint = %self.endpoint, error = %err, "MySQL ping failed, reconnecting");
                self.connection = MySqlConnection::connect_with(&self.options)
                    .await
                    .map_err(|source| MysqlError::Connect {
                        endpoint: self.endpoint.clone(),
                        source,
                    })?;
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn settle<T>(&mut self, operation: &'static str, outcome: Result<T, MysqlError>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(operation, endpoint = %self.endpoint, error = %err, "MySQL operation failed");
                self.last_error = Some(err);
                None
            }
        }
    }
}

//! Query construction and dispatch.
//!
//! A [`Query`] bundles the statement text, inline external datasets and
//! request parameters. Dispatch goes through the connection's transport;
//! every consumption mode (discard, row scan, JSON decode) shares the same
//! fetch path and therefore the same error semantics.

use crate::connection::Connection;
use crate::error::{ClickHouseError, ConnectionError};
use crate::query::params::QueryParams;
use crate::query::results::RowIter;
use crate::query::structured::{decode_with_stats, with_json_format, ExecutionStats, JsonEnvelope};
use crate::transport::classify_error;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Maximum statement length echoed into log records.
const SQL_PREVIEW_LEN: usize = 80;

/// Inline dataset the server materializes as a temporary table for the
/// duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct External {
    /// Table name the statement refers to
    pub name: String,
    /// Column declaration, e.g. `"id UInt64, name String"`
    pub structure: String,
    /// Table contents in TabSeparated format
    pub data: Vec<u8>,
}

impl External {
    /// Create a new external dataset.
    pub fn new(
        name: impl Into<String>,
        structure: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            structure: structure.into(),
            data: data.into(),
        }
    }
}

/// A request to the database.
///
/// Dispatch methods borrow the query; the JSON modes work on a copy, so the
/// caller's statement text is never altered by a dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Statement text
    sql: String,
    /// External datasets, in the order they were added
    externals: Vec<External>,
    /// Request parameters
    params: QueryParams,
}

impl Query {
    /// Create a query from statement text.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            externals: Vec::new(),
            params: QueryParams::new(),
        }
    }

    /// Get the statement text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Replace the statement text.
    pub fn set_sql(&mut self, sql: impl Into<String>) {
        self.sql = sql.into();
    }

    /// Attached external datasets.
    pub fn externals(&self) -> &[External] {
        &self.externals
    }

    /// Request parameters.
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut QueryParams {
        &mut self.params
    }

    /// Attach an external dataset.
    ///
    /// `structure` is not checked here; a malformed declaration surfaces as a
    /// server error once the query is dispatched.
    pub fn add_external(
        &mut self,
        name: impl Into<String>,
        structure: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) {
        self.externals.push(External::new(name, structure, data));
    }

    /// Add a request parameter. Repeated names accumulate values.
    pub fn add_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.add(name, value);
    }

    /// Apply default parameters without overriding names already set.
    pub fn merge_params(&mut self, defaults: &QueryParams) {
        self.params.merge_defaults(defaults);
    }

    /// Builder-style [`Query::add_external`].
    pub fn with_external(
        mut self,
        name: impl Into<String>,
        structure: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        self.add_external(name, structure, data);
        self
    }

    /// Builder-style [`Query::add_param`].
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_param(name, value);
        self
    }

    /// Split into statement, externals and parameters.
    pub(crate) fn into_parts(self) -> (String, Vec<External>, QueryParams) {
        (self.sql, self.externals, self.params)
    }

    /// Execute the query and discard the response body.
    ///
    /// # Errors
    /// - `ClickHouseError::Connection` if `conn` is `None`
    /// - `ClickHouseError::Transport` if the request fails
    /// - `ClickHouseError::Server` if the server reports a failure
    pub async fn exec<'a>(
        &self,
        conn: impl Into<Option<&'a Connection>>,
    ) -> Result<(), ClickHouseError> {
        self.fetch(conn.into(), false).await.map(|_| ())
    }

    /// Execute the query and iterate over its TabSeparated rows.
    ///
    /// The whole response is retrieved before this returns. Dispatch errors
    /// are not returned directly; they become the iterator's sticky error.
    pub async fn iter<'a>(&self, conn: impl Into<Option<&'a Connection>>) -> RowIter {
        match self.fetch(conn.into(), true).await {
            Ok(body) => RowIter::new(body),
            Err(err) => RowIter::failed(err),
        }
    }

    /// Execute the query with `FORMAT JSON` and decode the `data` member.
    ///
    /// # Errors
    /// Dispatch errors as for [`Query::exec`], plus `ClickHouseError::Decode`
    /// when the envelope or its data cannot be decoded into `T`.
    pub async fn exec_scan<'a, T: DeserializeOwned>(
        &self,
        conn: impl Into<Option<&'a Connection>>,
    ) -> Result<T, ClickHouseError> {
        let body = self.json_query().fetch(conn.into(), false).await?;
        let mut envelope = JsonEnvelope::parse(&body)?;
        Ok(envelope.take_data()?)
    }

    /// Like [`Query::exec_scan`], also returning the execution statistics.
    pub async fn exec_scan_stat<'a, T: DeserializeOwned>(
        &self,
        conn: impl Into<Option<&'a Connection>>,
    ) -> Result<(T, ExecutionStats), ClickHouseError> {
        let body = self.json_query().fetch(conn.into(), false).await?;
        Ok(decode_with_stats(&body)?)
    }

    /// Copy of this query with the JSON format directive appended.
    fn json_query(&self) -> Query {
        let mut query = self.clone();
        query.sql = with_json_format(&self.sql);
        query
    }

    /// Send the query and return the body of a successful response.
    ///
    /// Checks, in order: connection present, transport succeeded, body is not
    /// a server error report.
    pub(crate) async fn fetch(
        &self,
        conn: Option<&Connection>,
        streaming: bool,
    ) -> Result<String, ClickHouseError> {
        let conn = conn.ok_or(ConnectionError::MissingConnection)?;

        debug!(
            sql = %sql_preview(&self.sql),
            externals = self.externals.len(),
            params = self.params.len(),
            streaming,
            "dispatching query"
        );

        let body = conn.transport().exec(conn, self, streaming).await?;

        if let Some(err) = classify_error(&body) {
            warn!(code = err.code, message = %err.message, "server rejected query");
            return Err(err.into());
        }

        debug!(bytes = body.len(), "query succeeded");
        Ok(body)
    }
}

/// Single-line, length-limited copy of a statement for logging.
fn sql_preview(sql: &str) -> String {
    let flat = sql.replace('\n', " ");
    match flat.char_indices().nth(SQL_PREVIEW_LEN) {
        Some((idx, _)) => format!("{}...", &flat[..idx]),
        None => flat,
    }
}

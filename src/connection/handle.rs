//! Connection handle shared by every query dispatch.
//!
//! A `Connection` holds no socket. It names the endpoint, carries the default
//! request parameters, and owns the transport that performs the requests, so
//! cloning one is cheap and clones share the same transport.

use crate::connection::params::ConnectionParams;
use crate::error::ClickHouseError;
use crate::query::QueryParams;
use crate::transport::{HttpTransport, Transport};
use std::str::FromStr;
use std::sync::Arc;

/// Handle to a ClickHouse server.
///
/// # Example
///
/// ```no_run
/// use chquery::connection::Connection;
/// use chquery::query::Query;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let conn = Connection::from_url("clickhouse://localhost:8123/default?timeout=30")?;
///
/// let (rows, stats) = Query::new("SELECT number FROM system.numbers LIMIT 10")
///     .exec_scan_stat::<Vec<serde_json::Value>>(&conn)
///     .await?;
/// println!("{} rows in {}s", rows.len(), stats.elapsed);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Connection {
    /// Base URL requests are sent to
    host: String,
    /// Transport performing the requests
    transport: Arc<dyn Transport>,
    /// Parameters added to every query that does not set them itself
    params: QueryParams,
}

impl Connection {
    /// Create a connection to `host` using `transport`, with no default parameters.
    pub fn new(host: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            host: host.into(),
            transport,
            params: QueryParams::new(),
        }
    }

    /// Create an HTTP connection from validated parameters.
    ///
    /// # Errors
    ///
    /// Returns `ClickHouseError::Transport` if the HTTP client cannot be built.
    pub fn open(params: &ConnectionParams) -> Result<Self, ClickHouseError> {
        let transport = HttpTransport::with_timeout(params.query_timeout)?;
        Ok(Self::new(params.base_url(), Arc::new(transport)).with_params(params.default_params()))
    }

    /// Parse a connection string and open an HTTP connection.
    ///
    /// # Errors
    ///
    /// Returns `ClickHouseError::Connection` if the string is invalid.
    pub fn from_url(url: &str) -> Result<Self, ClickHouseError> {
        let params = ConnectionParams::from_str(url)?;
        Self::open(&params)
    }

    /// Replace the default parameters.
    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    /// Base URL requests are sent to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Default parameters merged into every query.
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Mutable access to the default parameters.
    pub fn params_mut(&mut self) -> &mut QueryParams {
        &mut self.params
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.params.iter().map(|(name, _)| name).collect();
        f.debug_struct("Connection")
            .field("host", &self.host)
            .field("params", &names)
            .finish()
    }
}

//! Common test utilities for chquery-rs tests.
//!
//! # Integration Test Prerequisites
//!
//! Live tests require a ClickHouse server with the HTTP interface enabled:
//!
//! ```bash
//! docker run -d --name clickhouse-test -p 8123:8123 clickhouse/clickhouse-server:latest
//! ```
//!
//! # Configuration
//!
//! | Default Constant | Environment Variable | Default Value |
//! |------------------|----------------------|---------------|
//! | `DEFAULT_HOST`   | `CLICKHOUSE_HOST`    | "localhost"   |
//! | `DEFAULT_PORT`   | `CLICKHOUSE_PORT`    | 8123          |
//!
//! Offline tests use [`CannedTransport`], which answers every request with a
//! fixed body and records what it was asked to send.

#![allow(dead_code)]

use async_trait::async_trait;
use chquery::connection::{Connection, ConnectionParams};
use chquery::error::{ClickHouseError, TransportError};
use chquery::query::Query;
use chquery::transport::{prepare_request, PreparedRequest, Transport};
use std::env;
use std::net::{TcpStream, ToSocketAddrs};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Connection Constants with Default Values
// ============================================================================

/// Default host for the ClickHouse HTTP interface.
pub const DEFAULT_HOST: &str = "localhost";

/// Default port for the ClickHouse HTTP interface.
pub const DEFAULT_PORT: u16 = 8123;

const ENV_CLICKHOUSE_HOST: &str = "CLICKHOUSE_HOST";
const ENV_CLICKHOUSE_PORT: &str = "CLICKHOUSE_PORT";

// ============================================================================
// Configuration Helpers
// ============================================================================

/// Get the ClickHouse host from `CLICKHOUSE_HOST` or use the default.
pub fn get_host() -> String {
    env::var(ENV_CLICKHOUSE_HOST).unwrap_or_else(|_| DEFAULT_HOST.to_string())
}

/// Get the ClickHouse port from `CLICKHOUSE_PORT` or use the default.
///
/// An unparsable value falls back to the default.
pub fn get_port() -> u16 {
    env::var(ENV_CLICKHOUSE_PORT)
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Connection string for the configured server.
pub fn get_test_connection_string() -> String {
    format!("clickhouse://{}:{}?timeout=30", get_host(), get_port())
}

/// Open a connection to the configured server.
pub fn get_test_connection() -> Result<Connection, ClickHouseError> {
    let params = ConnectionParams::from_str(&get_test_connection_string())?;
    Connection::open(&params)
}

/// Check whether a TCP connection to the configured server succeeds.
pub fn is_clickhouse_available() -> bool {
    let addr = format!("{}:{}", get_host(), get_port());

    let socket_addrs: Vec<_> = match addr.to_socket_addrs() {
        Ok(addrs) => addrs.collect(),
        Err(_) => return false,
    };

    socket_addrs
        .iter()
        .any(|socket_addr| TcpStream::connect_timeout(socket_addr, Duration::from_secs(2)).is_ok())
}

/// Skip a test if ClickHouse is not available.
#[macro_export]
macro_rules! skip_if_no_clickhouse {
    () => {
        if !$crate::common::is_clickhouse_available() {
            eprintln!(
                "Skipping test: ClickHouse not available at {}:{}",
                $crate::common::get_host(),
                $crate::common::get_port()
            );
            return;
        }
    };
}

/// Unique table name for a live test.
pub fn generate_test_table_name(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    format!("chquery_{}_{}", prefix, timestamp)
}

// ============================================================================
// Canned Transport
// ============================================================================

/// One request seen by [`CannedTransport`].
#[derive(Debug, Clone)]
pub struct Recorded {
    pub sql: String,
    pub streaming: bool,
    pub request: PreparedRequest,
}

/// Transport answering every request with the same result.
pub struct CannedTransport {
    response: Result<String, TransportError>,
    seen: Mutex<Vec<Recorded>>,
}

impl CannedTransport {
    pub fn ok(body: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(body.to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: TransportError) -> Arc<Self> {
        Arc::new(Self {
            response: Err(err),
            seen: Mutex::new(Vec::new()),
        })
    }

    /// Requests received so far.
    pub fn seen(&self) -> Vec<Recorded> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Transport for CannedTransport {
    async fn exec(
        &self,
        conn: &Connection,
        query: &Query,
        streaming: bool,
    ) -> Result<String, TransportError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(Recorded {
                sql: query.sql().to_string(),
                streaming,
                request: prepare_request(conn, query),
            });
        }
        self.response.clone()
    }
}

/// Connection to a fake endpoint served by `transport`.
pub fn canned_connection(transport: Arc<CannedTransport>) -> Connection {
    Connection::new("http://localhost:8123/", transport)
}

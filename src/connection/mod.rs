//! Connection management for ClickHouse HTTP connections.
//!
//! This module provides connection string parsing, parameter validation and
//! the connection handle used to dispatch queries.
//!
//! # Example
//!
//! ```no_run
//! # use chquery::connection::{Connection, ConnectionBuilder, ConnectionParams};
//! # use std::str::FromStr;
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Using ConnectionBuilder
//! let params = ConnectionBuilder::new()
//!     .host("localhost")
//!     .port(8123)
//!     .database("logs")
//!     .setting("max_threads", "4")
//!     .query_timeout(std::time::Duration::from_secs(10))
//!     .build()?;
//! let conn = Connection::open(&params)?;
//!
//! // Or parse from connection string
//! let params = ConnectionParams::from_str(
//!     "clickhouse://localhost:8123/logs?timeout=10&max_threads=4"
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod handle;
pub mod params;

pub use handle::Connection;
pub use params::{ConnectionBuilder, ConnectionParams};

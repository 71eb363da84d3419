//! # chquery-rs
//!
//! Query layer for the ClickHouse HTTP interface.
//!
//! A [`Query`] bundles a statement with optional external datasets (in-memory
//! tables shipped alongside the statement) and request parameters. It can be
//! dispatched in three ways:
//!
//! - [`Query::exec`] runs the statement and discards the response
//! - [`Query::iter`] returns a [`RowIter`] scanning TabSeparated rows
//! - [`Query::exec_scan`] / [`Query::exec_scan_stat`] request `FORMAT JSON`
//!   and decode the rows, optionally with [`ExecutionStats`]
//!
//! ## Example
//!
//! ```no_run
//! # use chquery::*;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let conn = Connection::from_url("clickhouse://localhost:8123/default")?;
//!
//! let query = Query::new("SELECT id, name FROM users WHERE id IN ids")
//!     .with_external("ids", "id UInt32", "1\n2\n")
//!     .with_param("max_threads", "2");
//!
//! let mut rows = query.iter(&conn).await;
//! let (mut id, mut name) = (0u32, String::new());
//! while rows.scan(&mut [&mut id, &mut name]) {
//!     println!("{id}: {name}");
//! }
//! if let Some(err) = rows.error() {
//!     eprintln!("query failed: {err}");
//! }
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod connection;
pub mod error;
pub mod query;
pub mod transport;
pub mod types;

// Re-export public API
pub use connection::{Connection, ConnectionBuilder, ConnectionParams};
pub use error::{
    ClickHouseError, ConnectionError, ConversionError, DecodeError, ErrorKind, ServerError,
    TransportError,
};
pub use query::{ExecutionStats, External, Query, QueryParams, RowIter};
pub use transport::{HttpTransport, Transport};
pub use types::{FromField, ScanTarget};

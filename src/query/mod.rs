//! Query construction, dispatch and result handling.
//!
//! # Overview
//!
//! The query module is organized into:
//! - `statement` - the [`Query`] value, external datasets and dispatch
//! - `params` - multi-value request parameters
//! - `results` - row-by-row scanning of TabSeparated responses
//! - `structured` - JSON responses with execution statistics
//!
//! # Example
//!
//! ```no_run
//! use chquery::connection::Connection;
//! use chquery::query::Query;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Hit {
//!     id: u64,
//!     hits: u64,
//! }
//!
//! # async fn example(conn: &Connection) -> Result<(), Box<dyn std::error::Error>> {
//! let mut query = Query::new("SELECT id, count() AS hits FROM events WHERE id IN ids GROUP BY id");
//! query.add_external("ids", "id UInt64", "1\n2\n3\n");
//! query.add_param("max_threads", "4");
//!
//! // Buffered mode
//! let (rows, stats) = query.exec_scan_stat::<Vec<Hit>>(conn).await?;
//! println!("{} rows, {} bytes read", rows.len(), stats.bytes_read);
//!
//! // Streaming mode
//! let mut iter = query.iter(conn).await;
//! let (mut id, mut hits) = (0u64, 0u64);
//! while iter.scan(&mut [&mut id, &mut hits]) {
//!     println!("{id}: {hits}");
//! }
//! if let Some(err) = iter.error() {
//!     return Err(err.to_string().into());
//! }
//! # Ok(())
//! # }
//! ```

pub mod params;
pub mod results;
pub mod statement;
pub mod structured;

// Re-export commonly used types
pub use params::QueryParams;
pub use results::RowIter;
pub use statement::{External, Query};
pub use structured::{ExecutionStats, JsonEnvelope, JSON_FORMAT_DIRECTIVE};

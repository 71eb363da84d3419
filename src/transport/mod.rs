//! Transport layer for ClickHouse communication.
//!
//! # Architecture
//!
//! The transport layer is organized into:
//! - `protocol` - Transport trait definition
//! - `http` - HTTP interface implementation
//! - `response` - Detection of server errors inside response bodies
//!
//! # Example
//!
//! ```no_run
//! use chquery::connection::Connection;
//! use chquery::query::Query;
//! use chquery::transport::HttpTransport;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::with_timeout(Duration::from_secs(30))?;
//! let conn = Connection::new("http://localhost:8123/", Arc::new(transport));
//!
//! Query::new("CREATE TABLE IF NOT EXISTS t (x UInt8) ENGINE = Memory")
//!     .exec(&conn)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod http;
pub mod protocol;
pub mod response;

// Re-export commonly used types
pub use http::{prepare_request, HttpTransport, PreparedRequest, RequestBody};
pub use protocol::Transport;
pub use response::classify_error;

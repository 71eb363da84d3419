//! Transport abstraction trait.
//!
//! The query layer never performs network I/O itself. It hands a [`Query`]
//! to a `Transport` and receives the raw response body, so different
//! mechanisms (HTTP, test doubles, proxies) can be plugged in.

use crate::connection::Connection;
use crate::error::TransportError;
use crate::query::Query;
use async_trait::async_trait;

/// Request/response transport to the database server.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `query` on behalf of `conn` and return the raw response body.
    ///
    /// # Arguments
    ///
    /// * `conn` - Connection the request belongs to (endpoint, default parameters)
    /// * `query` - Statement, external datasets and parameters
    /// * `streaming` - Whether the caller will consume the body row by row
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the request cannot be sent or no response is
    /// received. A server-side failure delivered as a response body is not a
    /// transport error; it is returned as `Ok` and classified by the caller.
    async fn exec(
        &self,
        conn: &Connection,
        query: &Query,
        streaming: bool,
    ) -> Result<String, TransportError>;
}

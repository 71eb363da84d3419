//! Buffered JSON results with execution statistics.
//!
//! When a statement is run with `FORMAT JSON`, ClickHouse answers with an
//! envelope along the lines of:
//!
//! ```json
//! {
//!   "meta": [{"name": "id", "type": "UInt64"}],
//!   "data": [{"id": 1}],
//!   "rows": 1,
//!   "rows_before_limit_at_least": 1,
//!   "statistics": {"elapsed": 0.0012, "rows_read": 1, "bytes_read": 8}
//! }
//! ```
//!
//! The `data` member is decoded into a caller-chosen type; the counters are
//! collected into [`ExecutionStats`].

use crate::error::DecodeError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Directive appended to a statement to request the JSON envelope.
///
/// It goes on its own line so a trailing `--` comment cannot swallow it.
pub const JSON_FORMAT_DIRECTIVE: &str = "\nFORMAT JSON";

/// Execution statistics reported alongside a JSON result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStats {
    /// Rows in the result
    pub rows: u64,
    /// Lower bound of the row count had there been no LIMIT
    pub rows_before_limit_at_least: u64,
    /// Server-side execution time in seconds
    pub elapsed: f64,
    /// Rows read by the server
    pub rows_read: u64,
    /// Bytes read by the server
    pub bytes_read: u64,
}

/// Append the JSON format directive to a statement.
///
/// Trailing whitespace and semicolons are dropped first so the directive ends
/// up inside the statement.
pub fn with_json_format(sql: &str) -> String {
    let trimmed = sql.trim_end().trim_end_matches(';').trim_end();
    format!("{}{}", trimmed, JSON_FORMAT_DIRECTIVE)
}

/// Counter fields as they may appear in the envelope.
///
/// ClickHouse puts `rows` and `rows_before_limit_at_least` at the top level;
/// some proxies nest them inside `statistics`. Both layouts are accepted, the
/// top level wins.
#[derive(Debug, Default, Deserialize)]
struct StatsFields {
    rows: Option<u64>,
    rows_before_limit_at_least: Option<u64>,
    #[serde(default)]
    statistics: StatisticsBlock,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatisticsBlock {
    rows: Option<u64>,
    rows_before_limit_at_least: Option<u64>,
    elapsed: f64,
    rows_read: u64,
    bytes_read: u64,
}

impl From<StatsFields> for ExecutionStats {
    fn from(fields: StatsFields) -> Self {
        let block = fields.statistics;
        Self {
            rows: fields.rows.or(block.rows).unwrap_or_default(),
            rows_before_limit_at_least: fields
                .rows_before_limit_at_least
                .or(block.rows_before_limit_at_least)
                .unwrap_or_default(),
            elapsed: block.elapsed,
            rows_read: block.rows_read,
            bytes_read: block.bytes_read,
        }
    }
}

/// Parsed JSON response body.
#[derive(Debug)]
pub struct JsonEnvelope {
    fields: Map<String, Value>,
}

impl JsonEnvelope {
    /// Parse a response body; it must be a JSON object.
    pub fn parse(body: &str) -> Result<Self, DecodeError> {
        let fields: Map<String, Value> = serde_json::from_str(body)
            .map_err(|e| DecodeError::InvalidEnvelope(e.to_string()))?;
        Ok(Self { fields })
    }

    /// Decode the `data` member into `T`, leaving the remaining members.
    pub fn take_data<T: DeserializeOwned>(&mut self) -> Result<T, DecodeError> {
        let data = self.fields.remove("data").ok_or(DecodeError::MissingData)?;
        serde_json::from_value(data).map_err(|e| DecodeError::InvalidData(e.to_string()))
    }

    /// Collect the execution statistics. Absent counters read as zero.
    pub fn stats(&self) -> Result<ExecutionStats, DecodeError> {
        let fields = StatsFields::deserialize(&Value::Object(self.fields.clone()))
            .map_err(|e| DecodeError::InvalidStatistics(e.to_string()))?;
        Ok(fields.into())
    }
}

/// Decode a complete JSON response body into its data and statistics.
pub fn decode_with_stats<T: DeserializeOwned>(
    body: &str,
) -> Result<(T, ExecutionStats), DecodeError> {
    let mut envelope = JsonEnvelope::parse(body)?;
    let data = envelope.take_data()?;
    let stats = envelope.stats()?;
    Ok((data, stats))
}

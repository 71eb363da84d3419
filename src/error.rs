//! Error types for chquery-rs.
//!
//! Errors are grouped by the stage that produced them: obtaining a connection,
//! moving bytes over the transport, the server rejecting the statement, and
//! decoding the response body.

use std::fmt;
use thiserror::Error;

/// Top-level error type encompassing all possible errors.
#[derive(Error, Debug)]
pub enum ClickHouseError {
    /// Connection handle or configuration errors
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Send/receive failures
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Failure reported by the server inside a delivered response
    #[error(transparent)]
    Server(#[from] ServerError),

    /// Response body could not be interpreted
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Errors related to the connection handle and its configuration.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// No connection handle was supplied
    #[error("Connection handle is absent")]
    MissingConnection,

    /// Connection string parsing error
    #[error("Failed to parse connection string: {0}")]
    ParseError(String),

    /// Invalid connection parameters
    #[error("Invalid connection parameter '{parameter}': {message}")]
    InvalidParameter { parameter: String, message: String },
}

/// Errors raised while sending a request or receiving its response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Non-success HTTP status whose body is not a server error report
    #[error("Unexpected HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Request could not be assembled
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Failure reported by the database server in an otherwise delivered response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Server error (code {code}): {message}")]
pub struct ServerError {
    /// Numeric server error code
    pub code: i32,
    /// Exception text
    pub message: String,
}

/// Errors related to interpreting a response body.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The body is not a well-formed JSON envelope
    #[error("Invalid response envelope: {0}")]
    InvalidEnvelope(String),

    /// The envelope carries no `data` field
    #[error("Response envelope has no data field")]
    MissingData,

    /// The `data` field does not match the requested shape
    #[error("Cannot decode result data: {0}")]
    InvalidData(String),

    /// The statistics fields could not be decoded
    #[error("Cannot decode execution statistics: {0}")]
    InvalidStatistics(String),

    /// A tab-separated field could not be converted
    #[error("Failed to convert field {column}: {source}")]
    FieldConversion {
        column: usize,
        #[source]
        source: ConversionError,
    },
}

/// Errors raised when converting a single textual field into a typed value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// Text is not a valid representation of the target type
    #[error("Cannot parse '{value}' as {target}: {message}")]
    InvalidValue {
        target: &'static str,
        value: String,
        message: String,
    },

    /// Array literal is not properly delimited
    #[error("Malformed array literal: {0}")]
    MalformedArray(String),
}

impl ConversionError {
    pub(crate) fn invalid(target: &'static str, value: &str, message: impl fmt::Display) -> Self {
        ConversionError::InvalidValue {
            target,
            value: value.to_string(),
            message: message.to_string(),
        }
    }
}

/// Coarse classification of a [`ClickHouseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Absent handle or bad configuration
    Connection,
    /// Network or HTTP failure
    Transport,
    /// Server-side failure
    Server,
    /// Response interpretation failure
    Decode,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Connection => write!(f, "CONNECTION"),
            ErrorKind::Transport => write!(f, "TRANSPORT"),
            ErrorKind::Server => write!(f, "SERVER"),
            ErrorKind::Decode => write!(f, "DECODE"),
        }
    }
}

impl ClickHouseError {
    /// Map to the coarse error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClickHouseError::Connection(_) => ErrorKind::Connection,
            ClickHouseError::Transport(_) => ErrorKind::Transport,
            ClickHouseError::Server(_) => ErrorKind::Server,
            ClickHouseError::Decode(_) => ErrorKind::Decode,
        }
    }
}

// Conversions from external error types
impl From<reqwest::Error> for TransportError {
    // The request URL carries every setting, credentials included
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_builder() {
            TransportError::InvalidRequest(err.to_string())
        } else {
            TransportError::HttpError(err.to_string())
        }
    }
}

//! HTTP transport for the ClickHouse HTTP interface.
//!
//! Without external datasets the statement is sent as the POST body. With
//! external datasets the statement moves into the `query` URL parameter, each
//! dataset declares its columns through a `<name>_structure` parameter, and the
//! body becomes `multipart/form-data` with one file part per dataset.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::connection::Connection;
use crate::error::TransportError;
use crate::query::{External, Query, QueryParams};

use super::protocol::Transport;
use super::response::classify_error;

/// URL parameter carrying the statement when the body is multipart.
pub const QUERY_PARAM: &str = "query";

/// Suffix of the URL parameter declaring an external dataset's columns.
pub const STRUCTURE_SUFFIX: &str = "_structure";

/// Body of a prepared request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Statement text sent as the raw body
    Statement(String),
    /// One multipart file part per external dataset
    Multipart(Vec<External>),
}

/// Everything needed to issue one HTTP request for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    /// Target URL including encoded parameters
    pub url: String,
    /// Request body
    pub body: RequestBody,
}

/// Translate `query` into an HTTP request for `conn`.
///
/// Connection default parameters are merged into a copy of the query first,
/// so per-query values take precedence.
pub fn prepare_request(conn: &Connection, query: &Query) -> PreparedRequest {
    let mut query = query.clone();
    query.merge_params(conn.params());
    let (sql, externals, mut params) = query.into_parts();

    if externals.is_empty() {
        return PreparedRequest {
            url: build_url(conn.host(), &params),
            body: RequestBody::Statement(sql),
        };
    }

    params.set(QUERY_PARAM, sql);
    for external in &externals {
        params.set(
            format!("{}{}", external.name, STRUCTURE_SUFFIX),
            external.structure.clone(),
        );
    }

    PreparedRequest {
        url: build_url(conn.host(), &params),
        body: RequestBody::Multipart(externals),
    }
}

/// Append encoded parameters to a base URL.
pub fn build_url(host: &str, params: &QueryParams) -> String {
    if params.is_empty() {
        return host.to_string();
    }
    let separator = if host.contains('?') { '&' } else { '?' };
    format!("{}{}{}", host, separator, params.encode())
}

/// HTTP transport backed by `reqwest`.
///
/// One request per dispatch; no pooling policy, retries or authentication
/// beyond what the underlying client does on its own.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a default HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the HTTP client cannot be built.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Use a preconfigured HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn exec(
        &self,
        conn: &Connection,
        query: &Query,
        streaming: bool,
    ) -> Result<String, TransportError> {
        let request = prepare_request(conn, query);
        let builder = self.client.post(&request.url);

        let builder = match request.body {
            RequestBody::Statement(sql) => builder.body(sql),
            RequestBody::Multipart(externals) => {
                let mut form = Form::new();
                for external in externals {
                    let part = Part::bytes(external.data).file_name(external.name.clone());
                    form = form.part(external.name, part);
                }
                builder.multipart(form)
            }
        };

        debug!(host = conn.host(), streaming, "sending HTTP request");
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "received HTTP response");

        // Error reports come with a non-2xx status; leave those to the caller's
        // classification and only fail here on bodies it would not recognize.
        if !status.is_success() && classify_error(&body).is_none() {
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

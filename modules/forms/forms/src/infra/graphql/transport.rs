//! GraphQL-over-HTTP transport.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{Method, StatusCode, Uri};
use http_body_util::{BodyExt, Full, Limited};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use super::error::GraphQlError;
use super::models::{GraphQlErrorEntry, GraphQlRequest, GraphQlResponse};

/// Upper bound on a buffered GraphQL response body.
const MAX_RESPONSE_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum TransportError {
    /// Network failure, timeout, or an HTTP error without a GraphQL body.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The backend answered with GraphQL errors.
    #[error("GraphQL query failed with {} error(s)", .0.len())]
    Query(Vec<GraphQlErrorEntry>),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<TransportError> for GraphQlError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Connect(reason) => Self::Connect(reason),
            TransportError::Query(entries) => Self::from_entries(&entries),
            e @ (TransportError::InvalidRequest(_) | TransportError::InvalidResponse(_)) => {
                Self::Unknown(Some(e.to_string()))
            }
        }
    }
}

/// Request/response channel to a GraphQL endpoint.
///
/// Returns the `data` object of a successful response.
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    async fn execute(
        &self,
        request: GraphQlRequest,
        bearer: Option<&SecretString>,
    ) -> Result<Value, TransportError>;
}

/// [`GraphQlTransport`] over plain HTTP/1.1 `POST` requests.
pub struct HttpTransport {
    client: Client<HttpConnector, Full<Bytes>>,
    endpoint: Uri,
    request_timeout: Duration,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidRequest`] if `endpoint` is not a valid
    /// HTTP URI.
    pub fn new(endpoint: &Url, request_timeout: Duration) -> Result<Self, TransportError> {
        let endpoint: Uri = endpoint
            .as_str()
            .parse()
            .map_err(|e: http::uri::InvalidUri| TransportError::InvalidRequest(e.to_string()))?;
        let client = Client::builder(TokioExecutor::new()).build_http();

        Ok(Self {
            client,
            endpoint,
            request_timeout,
        })
    }

    fn build_request(
        &self,
        request: &GraphQlRequest,
        bearer: Option<&SecretString>,
    ) -> Result<http::Request<Full<Bytes>>, TransportError> {
        let body = serde_json::to_vec(request)
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        let mut builder = http::Request::builder()
            .method(Method::POST)
            .uri(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if let Some(token) = bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()));
        }

        builder
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))
    }
}

#[async_trait]
impl GraphQlTransport for HttpTransport {
    async fn execute(
        &self,
        request: GraphQlRequest,
        bearer: Option<&SecretString>,
    ) -> Result<Value, TransportError> {
        let http_request = self.build_request(&request, bearer)?;

        let response = tokio::time::timeout(self.request_timeout, self.client.request(http_request))
            .await
            .map_err(|_| {
                TransportError::Connect(format!(
                    "request timed out after {}",
                    humantime::format_duration(self.request_timeout)
                ))
            })?
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        let status = response.status();
        let body = Limited::new(response.into_body(), MAX_RESPONSE_BYTES)
            .collect()
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?
            .to_bytes();

        tracing::trace!(
            operation = request.operation_name,
            status = status.as_u16(),
            bytes = body.len(),
            "GraphQL response received"
        );
        decode_response(status, &body)
    }
}

/// Split a GraphQL response body into its `data` object or its errors.
fn decode_response(status: StatusCode, body: &[u8]) -> Result<Value, TransportError> {
    let envelope: GraphQlResponse = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => {
            return Err(TransportError::InvalidResponse(e.to_string()));
        }
        Err(_) => return Err(TransportError::Connect(format!("HTTP {status}"))),
    };

    if let Some(errors) = envelope.errors {
        return Err(TransportError::Query(errors));
    }
    if !status.is_success() {
        return Err(TransportError::Connect(format!("HTTP {status}")));
    }

    envelope
        .data
        .filter(|data| !data.is_null())
        .ok_or_else(|| {
            TransportError::InvalidResponse("response carries neither data nor errors".to_owned())
        })
}

//! HTTP transport used by fetch workers

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::Client;
use std::io;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Other(String),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// Response body as a sequential byte reader.
///
/// Dropping the body releases the underlying connection.
pub type ResponseBody = Box<dyn AsyncRead + Send + Unpin>;

/// Status line and body of a completed GET
pub struct HttpResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self {
            status,
            body: Box::new(body),
        }
    }
}

/// Ready-to-use HTTP client shared by all workers.
///
/// Implementations own every timeout; callers apply none of their own.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue a GET and return once response headers are available
    async fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub tcp_connect_timeout: Duration,
    pub tls_handshake_timeout: Duration,
    pub response_header_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            tcp_connect_timeout: Duration::from_secs(3),
            tls_handshake_timeout: Duration::from_secs(1),
            response_header_timeout: Duration::from_secs(1),
            request_timeout: Duration::from_secs(5),
            user_agent: concat!("fetchsum/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    /// reqwest applies its connect timeout to TCP connect and TLS handshake together
    pub fn connect_timeout(&self) -> Duration {
        self.tcp_connect_timeout + self.tls_handshake_timeout
    }
}

/// reqwest-backed client
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Create a new HTTP client.
    ///
    /// The response header timeout is installed as reqwest's read timeout: once
    /// the connection is up, any read that stalls longer than that fails with a
    /// timeout. It bounds the wait for headers and every gap between body chunks.
    pub fn new(config: HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.response_header_timeout)
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .pool_max_idle_per_host(1)
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        debug!(url, "Sending request");

        let response = self.client.get(url).send().await?;

        let status = response.status().as_u16();
        debug!(url, status, "Response headers received");

        let stream = Box::pin(response.bytes_stream().map_err(io::Error::other));
        Ok(HttpResponse::new(status, StreamReader::new(stream)))
    }
}

//! Fetcher - performs one GET and digests the response body

use super::http::{HttpClient, ResponseBody};
use std::fmt;
use std::io;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Default read buffer: 128 MD5 blocks (8 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 128;

/// What happened to a single URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Lowercase hex MD5 of the full body
    Digest(String),
    Timeout,
    Unknown,
    /// Non-200 status; the body was not read
    Status(u16),
    /// Body stream failed mid-read
    Body(String),
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOutcome::Digest(hex) => f.write_str(hex),
            FetchOutcome::Timeout => f.write_str("error:timeout"),
            FetchOutcome::Unknown => f.write_str("error:unknown"),
            FetchOutcome::Status(code) => write!(f, "error:{}", code),
            FetchOutcome::Body(text) => write!(f, "error:{}", text),
        }
    }
}

/// Result token for one URL, rendered as `<url> <digest>` or `<url> error:<reason>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub url: String,
    pub outcome: FetchOutcome,
}

impl fmt::Display for FetchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.url, self.outcome)
    }
}

/// Fetch-and-digest operation with a fixed read buffer size
#[derive(Debug, Clone, Copy)]
pub struct Fetcher {
    chunk_size: usize,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Fetcher {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// GET `url` and classify the outcome. Never fails; every error becomes a token.
    pub async fn fetch(&self, client: &dyn HttpClient, url: &str) -> FetchResult {
        let outcome = match client.get(url).await {
            Err(e) => {
                debug!(url, error = %e, "Transport failure");
                if e.is_timeout() {
                    FetchOutcome::Timeout
                } else {
                    FetchOutcome::Unknown
                }
            }
            Ok(response) if response.status != 200 => {
                debug!(url, status = response.status, "Non-success status");
                FetchOutcome::Status(response.status)
            }
            Ok(response) => match self.digest_body(response.body).await {
                Ok(hex) => FetchOutcome::Digest(hex),
                Err(e) => {
                    debug!(url, error = %e, "Body read failed");
                    FetchOutcome::Body(e.to_string())
                }
            },
        };

        FetchResult {
            url: url.to_string(),
            outcome,
        }
    }

    /// Stream the body through an MD5 context, one buffer at a time.
    /// Consumes the body so it is released on every return path.
    async fn digest_body(&self, mut body: ResponseBody) -> io::Result<String> {
        let mut buffer = vec![0u8; self.chunk_size];
        let mut context = md5::Context::new();

        loop {
            let read = match body.read(&mut buffer).await {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            context.consume(&buffer[..read]);
        }

        Ok(format!("{:x}", context.compute()))
    }
}

/// Fetch `url` with the default buffer size and return its result token
pub async fn fetch_and_digest(client: &dyn HttpClient, url: &str) -> String {
    Fetcher::default().fetch(client, url).await.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::testing::FakeClient;

    fn md5_hex(data: &[u8]) -> String {
        format!("{:x}", md5::compute(data))
    }

    #[tokio::test]
    async fn test_fetch_small_and_large_bodies() {
        let large = "x".repeat(4096);
        let client = FakeClient::new()
            .with_body("http://small.test", "testBody")
            .with_body("http://large.test", large.clone());

        assert_eq!(
            fetch_and_digest(&client, "http://small.test").await,
            format!("http://small.test {}", md5_hex(b"testBody"))
        );
        assert_eq!(
            fetch_and_digest(&client, "http://large.test").await,
            format!("http://large.test {}", md5_hex(large.as_bytes()))
        );
    }

    #[tokio::test]
    async fn test_empty_body_digest() {
        let client = FakeClient::new().with_body("http://empty.test", "");

        assert_eq!(
            fetch_and_digest(&client, "http://empty.test").await,
            "http://empty.test d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[tokio::test]
    async fn test_digest_independent_of_chunk_size() {
        let body: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
        let expected = md5_hex(&body);
        let client = FakeClient::new().with_body("http://chunks.test", body);

        for chunk_size in [1, 3, 64, 1000, DEFAULT_CHUNK_SIZE, 1 << 16] {
            let result = Fetcher::new(chunk_size)
                .fetch(&client, "http://chunks.test")
                .await;
            assert_eq!(result.outcome, FetchOutcome::Digest(expected.clone()));
        }
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let client = FakeClient::new().with_status("http://timeout.test", 408, "timeout");

        assert_eq!(
            fetch_and_digest(&client, "http://timeout.test").await,
            "http://timeout.test error:408"
        );
    }

    #[tokio::test]
    async fn test_transport_error_classification() {
        let client = FakeClient::new()
            .with_timeout("http://slow.test")
            .with_refused("http://down.test");

        assert_eq!(
            fetch_and_digest(&client, "http://slow.test").await,
            "http://slow.test error:timeout"
        );
        assert_eq!(
            fetch_and_digest(&client, "http://down.test").await,
            "http://down.test error:unknown"
        );
    }

    #[tokio::test]
    async fn test_body_error_discards_partial_digest() {
        let client =
            FakeClient::new().with_broken_body("http://broken.test", "partial", "connection reset");

        let result = Fetcher::default().fetch(&client, "http://broken.test").await;
        assert_eq!(result.outcome, FetchOutcome::Body("connection reset".to_string()));
        assert_eq!(result.to_string(), "http://broken.test error:connection reset");
    }

    #[test]
    fn test_outcome_formatting() {
        let digest = FetchResult {
            url: "http://a".to_string(),
            outcome: FetchOutcome::Digest("abc".to_string()),
        };
        assert_eq!(digest.to_string(), "http://a abc");

        let status = FetchResult {
            url: "http://a".to_string(),
            outcome: FetchOutcome::Status(503),
        };
        assert_eq!(status.to_string(), "http://a error:503");
    }

    #[test]
    fn test_zero_chunk_size_is_raised() {
        assert_eq!(Fetcher::new(0).chunk_size(), 1);
        assert_eq!(Fetcher::default().chunk_size(), 8192);
    }
}

//! In-memory transport for worker tests

use super::http::{HttpClient, HttpResponse, Result, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::io::{self, Cursor};
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::io::StreamReader;

enum Route {
    Respond { status: u16, body: Vec<u8> },
    Timeout,
    Refused,
    Broken { prefix: Vec<u8>, message: String },
}

/// Fake client answering from a route table and counting calls per URL
#[derive(Default)]
pub(crate) struct FakeClient {
    routes: HashMap<String, Route>,
    jitter: bool,
    calls: Mutex<HashMap<String, usize>>,
}

impl FakeClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_body(self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.with_status(url, 200, body)
    }

    pub(crate) fn with_status(mut self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        let route = Route::Respond {
            status,
            body: body.into(),
        };
        self.routes.insert(url.to_string(), route);
        self
    }

    pub(crate) fn with_timeout(mut self, url: &str) -> Self {
        self.routes.insert(url.to_string(), Route::Timeout);
        self
    }

    pub(crate) fn with_refused(mut self, url: &str) -> Self {
        self.routes.insert(url.to_string(), Route::Refused);
        self
    }

    pub(crate) fn with_broken_body(mut self, url: &str, prefix: &str, message: &str) -> Self {
        let route = Route::Broken {
            prefix: prefix.as_bytes().to_vec(),
            message: message.to_string(),
        };
        self.routes.insert(url.to_string(), route);
        self
    }

    /// Delay each response by a few milliseconds derived from the URL
    pub(crate) fn with_jitter(mut self) -> Self {
        self.jitter = true;
        self
    }

    pub(crate) fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl HttpClient for FakeClient {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;

        if self.jitter {
            let millis = url.bytes().map(u64::from).sum::<u64>() % 7;
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }

        match self.routes.get(url) {
            None => Err(TransportError::Other(format!("no route for {}", url))),
            Some(Route::Timeout) => Err(TransportError::Timeout),
            Some(Route::Refused) => Err(TransportError::Other("connection refused".to_string())),
            Some(Route::Respond { status, body }) => {
                Ok(HttpResponse::new(*status, Cursor::new(body.clone())))
            }
            Some(Route::Broken { prefix, message }) => {
                let chunks = vec![
                    Ok(Bytes::from(prefix.clone())),
                    Err(io::Error::new(io::ErrorKind::ConnectionReset, message.clone())),
                ];
                let reader = StreamReader::new(futures::stream::iter(chunks));
                Ok(HttpResponse::new(200, reader))
            }
        }
    }
}

use crate::humanize::ByteSize;
use crate::worker::{DEFAULT_CHUNK_SIZE, HttpConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub fetch: FetchSettings,
    #[serde(default)]
    pub dispatch: DispatchSettings,
}

/// Transport timeouts, all in milliseconds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpSettings {
    #[serde(default = "default_tcp_connect_timeout_ms")]
    pub tcp_connect_timeout_ms: u64,
    #[serde(default = "default_tls_handshake_timeout_ms")]
    pub tls_handshake_timeout_ms: u64,
    #[serde(default = "default_response_header_timeout_ms")]
    pub response_header_timeout_ms: u64,
    /// Whole request including body
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            tcp_connect_timeout_ms: default_tcp_connect_timeout_ms(),
            tls_handshake_timeout_ms: default_tls_handshake_timeout_ms(),
            response_header_timeout_ms: default_response_header_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpSettings {
    pub fn to_http_config(&self) -> HttpConfig {
        HttpConfig {
            tcp_connect_timeout: Duration::from_millis(self.tcp_connect_timeout_ms),
            tls_handshake_timeout: Duration::from_millis(self.tls_handshake_timeout_ms),
            response_header_timeout: Duration::from_millis(self.response_header_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            user_agent: self.user_agent.clone(),
        }
    }
}

fn default_tcp_connect_timeout_ms() -> u64 {
    3_000
}

fn default_tls_handshake_timeout_ms() -> u64 {
    1_000
}

fn default_response_header_timeout_ms() -> u64 {
    1_000
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

fn default_user_agent() -> String {
    HttpConfig::default().user_agent
}

/// Body streaming settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchSettings {
    /// Read buffer per body read
    #[serde(default = "default_chunk_size")]
    pub chunk_size: ByteSize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

fn default_chunk_size() -> ByteSize {
    ByteSize(DEFAULT_CHUNK_SIZE as u64)
}

/// Worker pool sizing
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DispatchSettings {
    /// Used when `--parallel` is not given
    #[serde(default = "default_parallel")]
    pub default_parallel: i64,
    /// Upper bound applied to any requested parallelism
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            default_parallel: default_parallel(),
            max_parallel: default_max_parallel(),
        }
    }
}

fn default_parallel() -> i64 {
    1
}

fn default_max_parallel() -> usize {
    10
}

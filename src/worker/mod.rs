//! Fetch workers
//!
//! A [`Dispatcher`] feeds URLs to a fixed pool of tokio tasks. Each task runs
//! the [`Fetcher`] against a shared [`HttpClient`] and reports one
//! [`FetchResult`] per URL.

pub mod fetch;
pub mod http;
pub mod pool;

#[cfg(test)]
mod testing;

pub use fetch::{DEFAULT_CHUNK_SIZE, FetchOutcome, FetchResult, Fetcher, fetch_and_digest};
pub use http::{HttpClient, HttpConfig, HttpResponse, ReqwestClient, ResponseBody, TransportError};
pub use pool::{Dispatcher, process};

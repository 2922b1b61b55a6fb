//! Dispatcher - bounded worker pool over a single work queue
//!
//! Flow:
//! 1. Spawn one collector task that owns the output buffer
//! 2. Spawn `worker_count` workers sharing the receiving end of the work queue
//! 3. Publish every URL in input order, then drop the sender to close the queue
//! 4. Join all workers, then the collector
//!
//! Workers never touch the output buffer; they send finished results to the
//! collector, so tokens arrive whole and in completion order.

use super::fetch::{FetchResult, Fetcher};
use super::http::HttpClient;
use crate::observability::FetchStats;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

type WorkQueue = Arc<Mutex<mpsc::UnboundedReceiver<String>>>;

/// Owns the HTTP client and runs batches of URLs through a worker pool
pub struct Dispatcher {
    client: Arc<dyn HttpClient>,
    fetcher: Fetcher,
    stats: Arc<FetchStats>,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self {
            client,
            fetcher: Fetcher::default(),
            stats: Arc::new(FetchStats::new()),
        }
    }

    pub fn with_fetcher(mut self, fetcher: Fetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_stats(mut self, stats: Arc<FetchStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn stats(&self) -> &Arc<FetchStats> {
        &self.stats
    }

    /// Fetch every URL exactly once using `worker_count` concurrent workers.
    ///
    /// Returns the space-joined result tokens once all workers have drained
    /// the queue. Token order follows completion, not input order.
    pub async fn process(&self, worker_count: usize, urls: &[String]) -> String {
        let worker_count = if worker_count == 0 {
            warn!("Worker count of 0 requested, using 1");
            1
        } else {
            worker_count
        };

        info!(workers = worker_count, urls = urls.len(), "Starting dispatch");

        let (work_tx, work_rx) = mpsc::unbounded_channel::<String>();
        let queue: WorkQueue = Arc::new(Mutex::new(work_rx));
        let (result_tx, result_rx) = mpsc::unbounded_channel::<FetchResult>();

        let collector = tokio::spawn(collect(result_rx));

        let mut workers = JoinSet::new();
        for worker_id in 0..worker_count {
            workers.spawn(run_worker(
                worker_id,
                Arc::clone(&queue),
                result_tx.clone(),
                Arc::clone(&self.client),
                self.fetcher,
                Arc::clone(&self.stats),
            ));
        }
        // Collector finishes once the last worker drops its sender
        drop(result_tx);

        for url in urls {
            if work_tx.send(url.clone()).is_err() {
                error!(url = %url, "Work queue closed before all URLs were published");
                break;
            }
        }
        drop(work_tx);

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(processed) => debug!(processed, "Worker finished"),
                Err(e) => error!(error = %e, "Worker task terminated abnormally"),
            }
        }

        match collector.await {
            Ok(aggregate) => aggregate,
            Err(e) => {
                error!(error = %e, "Result collector terminated abnormally");
                String::new()
            }
        }
    }
}

/// Run `urls` through a fresh dispatcher with default fetch settings
pub async fn process(client: Arc<dyn HttpClient>, worker_count: usize, urls: &[String]) -> String {
    Dispatcher::new(client).process(worker_count, urls).await
}

async fn run_worker(
    worker_id: usize,
    queue: WorkQueue,
    results: mpsc::UnboundedSender<FetchResult>,
    client: Arc<dyn HttpClient>,
    fetcher: Fetcher,
    stats: Arc<FetchStats>,
) -> usize {
    let mut processed = 0;

    loop {
        let next = queue.lock().await.recv().await;
        let Some(url) = next else {
            break;
        };

        let result = fetcher.fetch(client.as_ref(), &url).await;
        debug!(worker_id, url = %url, outcome = %result.outcome, "URL processed");
        stats.record(&result.outcome);
        processed += 1;

        if results.send(result).is_err() {
            warn!(worker_id, "Result collector gone, stopping worker");
            break;
        }
    }

    processed
}

async fn collect(mut results: mpsc::UnboundedReceiver<FetchResult>) -> String {
    let mut aggregate = String::new();

    while let Some(result) = results.recv().await {
        if !aggregate.is_empty() {
            aggregate.push(' ');
        }
        aggregate.push_str(&result.to_string());
    }

    aggregate
}

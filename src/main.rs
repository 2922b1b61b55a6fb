mod cli;

use clap::Parser;
use cli::Cli;
use fetchsum::config::Config;
use fetchsum::input;
use fetchsum::observability::{self, FetchStats};
use fetchsum::worker::{Dispatcher, Fetcher, ReqwestClient};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    observability::init_tracing();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    let urls = input::normalize_urls(&cli.urls)?;
    let requested = cli.parallel.unwrap_or(config.dispatch.default_parallel);
    let workers = input::parallel_count(
        requested,
        urls.len(),
        config.dispatch.max_parallel,
        |adjustment| warn!(%adjustment, "Adjusted parallel request count"),
    );

    let client = ReqwestClient::new(config.http.to_http_config())?;
    let fetcher = Fetcher::new(config.fetch.chunk_size.as_usize());
    let stats = Arc::new(FetchStats::new());

    let dispatcher = Dispatcher::new(Arc::new(client))
        .with_fetcher(fetcher)
        .with_stats(Arc::clone(&stats));

    let output = dispatcher.process(workers, &urls).await;
    println!("{}", output);

    let summary = stats.snapshot();
    info!(
        urls = urls.len(),
        workers,
        chunk_size = fetcher.chunk_size(),
        digested = summary.digested,
        failed = summary.failed(),
        "Run complete"
    );

    Ok(())
}

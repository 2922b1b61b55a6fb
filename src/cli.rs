use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fetchsum")]
#[command(about = "Fetch URLs in parallel and print the MD5 of each response body", long_about = None)]
pub struct Cli {
    /// URLs or bare hostnames; http:// is assumed when no scheme is given
    pub urls: Vec<String>,

    /// Number of parallel requests, clamped to [1, max_parallel] and the URL count
    #[arg(short, long, allow_negative_numbers = true)]
    pub parallel: Option<i64>,

    /// TOML configuration file (defaults to $FETCHSUM_CONFIG or config/fetchsum.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

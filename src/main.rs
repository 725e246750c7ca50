use clap::Parser;
use color_eyre::Result;
use env_logger::{Builder, Env};

mod config;
mod diff;
mod fetcher;
mod runner;
mod storage;
mod util;

use crate::config::CONFIG;
use crate::fetcher::RedditFetcher;
use crate::storage::FileStorage;

#[derive(Parser)]
#[command(version, about = "Tracks subreddit top listings and records what changed between runs")]
struct Cli {
    /// Subreddits to process, in order
    #[arg(required = true, value_name = "SUBREDDIT")]
    subreddits: Vec<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let storage = FileStorage::new(&CONFIG.data_dir);
    runner::run_batch(
        &RedditFetcher,
        &storage,
        &cli.subreddits,
        CONFIG.monitored_top_posts,
    )?;
    Ok(())
}

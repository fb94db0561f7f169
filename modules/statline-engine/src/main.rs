use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use statline_core::{PlatformId, ReqwestTransport};
use statline_engine::StatAggregator;

#[derive(Parser)]
#[command(name = "statline")]
#[command(about = "Fetch competitive-programming profile statistics")]
#[command(version)]
struct Cli {
    /// LeetCode username
    #[arg(long)]
    leetcode: Option<String>,

    /// Codeforces handle
    #[arg(long)]
    codeforces: Option<String>,

    /// CodeChef username
    #[arg(long)]
    codechef: Option<String>,

    /// HackerRank username
    #[arg(long)]
    hackerrank: Option<String>,

    /// GeeksforGeeks username
    #[arg(long)]
    geeksforgeeks: Option<String>,

    /// Per-strategy timeout in seconds
    #[arg(long, default_value_t = 15)]
    timeout_secs: u64,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    fn queries(&self) -> HashMap<PlatformId, String> {
        let pairs = [
            (PlatformId::LeetCode, &self.leetcode),
            (PlatformId::Codeforces, &self.codeforces),
            (PlatformId::CodeChef, &self.codechef),
            (PlatformId::HackerRank, &self.hackerrank),
            (PlatformId::GeeksForGeeks, &self.geeksforgeeks),
        ];
        pairs
            .into_iter()
            .filter_map(|(platform, username)| {
                username.as_ref().map(|u| (platform, u.clone()))
            })
            .collect()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("statline=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let queries = cli.queries();
    if queries.is_empty() {
        bail!("no usernames given; pass at least one of --leetcode, --codeforces, --codechef, --hackerrank, --geeksforgeeks");
    }

    info!(platforms = queries.len(), "Starting profile extraction");

    let aggregator = StatAggregator::new(Arc::new(ReqwestTransport::new()))
        .with_timeout(Duration::from_secs(cli.timeout_secs));
    let results = aggregator.fetch_all(&queries).await;

    // Key the output map by platform name for stable, readable JSON.
    let output: std::collections::BTreeMap<&str, _> = results
        .iter()
        .map(|(platform, result)| (platform.as_str(), result))
        .collect();

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");

    Ok(())
}

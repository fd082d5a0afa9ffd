//! CLI entry point for the MIDI downloader.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use midi_downloader::{
    ClientConfig, FileSystemRepository, GameDownloader, KhinsiderCatalog, KhinsiderClient,
    PageParser, ProgressReporter, SystemDownloader,
};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .init();

    debug!(?args, "CLI arguments parsed");

    let config = ClientConfig::default()
        .with_rate_limit_secs(args.delay)
        .with_max_retries(u32::from(args.max_retries))
        .with_timeout(Duration::from_secs(args.timeout))
        .with_user_agent(args.user_agent.clone());
    let client = KhinsiderClient::new(config).context("failed to create HTTP client")?;

    let summary = run(&args, &client).await;
    client.close();

    println!("\n{summary}");
    Ok(())
}

/// Runs the selected download mode and returns the completion summary.
async fn run(args: &Args, client: &KhinsiderClient) -> String {
    let catalog = KhinsiderCatalog::new(client, PageParser::new(args.site_root.as_str()));
    let storage = FileSystemRepository::new();
    let progress = ProgressReporter::new(!args.no_progress && !args.quiet);
    let games = GameDownloader::new(client, &catalog, &storage).with_progress(progress.clone());

    if let Some(game_url) = &args.game {
        info!(url = %game_url, output = %args.output.display(), "Downloading game");
        let downloaded = games.execute(game_url, &args.output, args.resume).await;
        return format!("Downloaded {} MIDI files", downloaded.len());
    }

    // clap guarantees exactly one of --game / --system
    let system = args.system.as_deref().unwrap_or_default();
    info!(system, output = %args.output.display(), "Downloading system");
    let downloader = SystemDownloader::new(&catalog, &storage, games).with_progress(progress);
    let result = downloader.execute(system, &args.output, args.resume).await;
    let total: usize = result.iter().map(|game| game.total_midi_count()).sum();
    format!("Downloaded {total} MIDI files from {} games", result.len())
}

use clap::Parser;
use log::{error, info};
use spotify_search::config::{self, DEFAULT_CONFIG_PATH};
use spotify_search::{SearchKind, SpotifyClient};
use std::error::Error;
use std::path::PathBuf;

/// Search the Spotify catalog and print the raw JSON response.
#[derive(Parser, Debug)]
#[command(name = "spotify-search", version, about)]
struct Cli {
    /// Search query
    query: String,

    /// Restrict results to one kind: artist, playlist, track, show or episode
    #[arg(short = 't', long = "type")]
    kind: Option<SearchKind>,

    /// Maximum number of results
    #[arg(short, long)]
    limit: Option<u32>,

    /// Path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = config::load_config(&cli.config)?;

    let client = SpotifyClient::from_config(&config.spotify)?;

    info!("Searching for {:?}", cli.query);
    let results = client.search(&cli.query, cli.kind, cli.limit).await?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

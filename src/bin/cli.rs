use anyhow::{Context, Result};
use clap::Parser;
use kambi_snapshot::config::{
    Config, DEFAULT_BASE_URL, DEFAULT_CONCURRENCY, DEFAULT_GRAPHQL_URL, DEFAULT_LANGUAGE,
    DEFAULT_MARKET,
};
use kambi_snapshot::data::{save_events_to_csv, save_events_to_json};
use kambi_snapshot::{run_snapshot, SnapshotStore};

/// Snapshot pre-match three-way odds of a betting offering into SQLite
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Offering identifier, e.g. "paflv"
    #[arg(env = "KAMBI_OFFERING", default_value = "paflv")]
    offering: String,

    #[arg(long, env = "KAMBI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, env = "KAMBI_GRAPHQL_URL", default_value = DEFAULT_GRAPHQL_URL)]
    graphql_url: String,

    #[arg(long, env = "KAMBI_LANGUAGE", default_value = DEFAULT_LANGUAGE)]
    language: String,

    #[arg(long, env = "KAMBI_MARKET", default_value = DEFAULT_MARKET)]
    market: String,

    /// Maximum concurrent event list requests
    #[arg(long, env = "KAMBI_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Directory for events_<offering>.db
    #[arg(long, env = "KAMBI_OUTPUT_DIR", default_value = ".")]
    output_dir: String,

    /// Keep an existing database and only add events it does not have
    #[arg(long)]
    append: bool,

    /// Also export the snapshot to CSV
    #[arg(long)]
    csv: Option<String>,

    /// Also export the snapshot to JSON
    #[arg(long)]
    json: Option<String>,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Config {
            offering: args.offering.clone(),
            base_url: args.base_url.clone(),
            graphql_url: args.graphql_url.clone(),
            language: args.language.clone(),
            market: args.market.clone(),
            concurrency: args.concurrency,
            output_dir: args.output_dir.clone(),
            reset_store: !args.append,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    println!("Fetching events for offering \"{}\"...\n", args.offering);

    let summary = run_snapshot(Config::from(&args)).await?;

    for (i, sport) in summary.sports.iter().enumerate() {
        println!(
            "{}. {}: {} lists ({} failed), {} events, {} not started, {} new",
            i + 1,
            sport.sport,
            sport.urls,
            sport.failures.len(),
            sport.events_fetched,
            sport.records,
            sport.inserted
        );
        for failure in &sport.failures {
            println!("   failed {}: {}", failure.url, failure.reason);
        }
    }

    println!(
        "\nData from \"{}\" successfully stored in {} ({} new events)",
        summary.offering,
        summary.db_path.display(),
        summary.total_inserted()
    );
    println!("Total time: {:.2} seconds", summary.elapsed.as_secs_f64());

    if args.csv.is_some() || args.json.is_some() {
        let store = SnapshotStore::open(&summary.db_path)
            .context("Failed to reopen store for export")?;
        let events = store.load_all()?;
        store.finish()?;

        if let Some(path) = &args.csv {
            save_events_to_csv(&events, path)?;
            println!("Saved {} events to {}", events.len(), path);
        }
        if let Some(path) = &args.json {
            save_events_to_json(&events, path)?;
            println!("Saved {} events to {}", events.len(), path);
        }
    }

    Ok(())
}

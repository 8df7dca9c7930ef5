pub mod api;
pub mod config;
pub mod models;
pub mod storage;
pub mod utils;

pub use api::*;
pub use config::Config;
pub use models::*;
pub use storage::{SnapshotStore, StoreError};
pub use utils::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use utils::normalize::normalize_events;
use utils::paths::collect_leaf_urls;

/// What one sport contributed to the snapshot
#[derive(Debug, Clone)]
pub struct SportSummary {
    pub sport: String,
    pub urls: usize,
    pub events_fetched: usize,
    /// Event list URLs that contributed nothing, with the reason
    pub failures: Vec<FetchFailure>,
    pub records: usize,
    /// Records that were new to the store
    pub inserted: usize,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub offering: String,
    pub db_path: PathBuf,
    pub sports: Vec<SportSummary>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn total_inserted(&self) -> usize {
        self.sports.iter().map(|s| s.inserted).sum()
    }
}

/// Snapshot every not-started event of the offering into
/// `events_<offering>.db`.
///
/// Sports are processed one after another; only the event list requests of
/// a single sport run concurrently. Discovery and fetch failures are logged
/// and skipped, storage failures end the run.
pub async fn run_snapshot(config: Config) -> Result<RunSummary> {
    let client = KambiClient::new(config)?;
    let config = client.config().clone();

    let sports = match client.fetch_sports().await {
        Ok(sports) => sports,
        Err(e) => {
            warn!("Failed to fetch sports for {}: {:#}", config.offering, e);
            Vec::new()
        }
    };
    info!("Found {} sports for {}", sports.len(), config.offering);

    let db_path = Path::new(&config.output_dir).join(config.db_file_name());
    let store = if config.reset_store {
        SnapshotStore::create_fresh(&db_path)
    } else {
        SnapshotStore::open(&db_path)
    }
    .with_context(|| format!("Failed to open store {}", db_path.display()))?;

    let start_time = Instant::now();
    let mut summaries = Vec::with_capacity(sports.len());

    for sport in sports {
        let summary = snapshot_sport(&client, &store, &sport).await?;
        info!(
            "{}: {} urls, {} events, {} stored",
            sport, summary.urls, summary.events_fetched, summary.inserted
        );
        summaries.push(summary);
    }

    store
        .finish()
        .with_context(|| format!("Failed to commit store {}", db_path.display()))?;

    let elapsed = start_time.elapsed();
    info!(
        "Data from \"{}\" stored in {} in {:.2}s",
        config.offering,
        db_path.display(),
        elapsed.as_secs_f64()
    );

    Ok(RunSummary {
        offering: config.offering,
        db_path,
        sports: summaries,
        elapsed,
    })
}

/// Discover, fetch, normalize and store one sport
pub async fn snapshot_sport(
    client: &KambiClient,
    store: &SnapshotStore,
    sport: &str,
) -> Result<SportSummary> {
    let urls = match client.fetch_category_tree(sport).await {
        Ok(tree) => collect_leaf_urls(&tree, client.config()),
        Err(e) => {
            warn!("Failed to fetch paths for {}: {:#}", sport, e);
            Vec::new()
        }
    };

    let batch = client.fetch_events(&urls).await;
    let records = normalize_events(&batch.events, sport);
    let inserted = store
        .insert_bulk(&records)
        .with_context(|| format!("Failed to store events for {}", sport))?;

    Ok(SportSummary {
        sport: sport.to_string(),
        urls: urls.len(),
        events_fetched: batch.events.len(),
        failures: batch.failures,
        records: records.len(),
        inserted,
    })
}

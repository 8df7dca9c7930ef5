use crate::models::NormalizedEvent;
use anyhow::{Context, Result};

/// Save a snapshot to CSV with a header row
pub fn save_events_to_csv(events: &[NormalizedEvent], filename: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename).context("Failed to create CSV file")?;
    for event in events {
        writer
            .serialize(event)
            .context("Failed to write CSV record")?;
    }
    writer.flush().context("Failed to flush CSV file")?;
    Ok(())
}

/// Save a snapshot to a pretty-printed JSON file
pub fn save_events_to_json(events: &[NormalizedEvent], filename: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(events).context("Failed to serialize events")?;
    std::fs::write(filename, json).context("Failed to write JSON file")?;
    Ok(())
}

/// Load a snapshot previously saved with [`save_events_to_json`]
pub fn load_events_from_json(filename: &str) -> Result<Vec<NormalizedEvent>> {
    let json = std::fs::read_to_string(filename).context("Failed to read JSON file")?;
    let events = serde_json::from_str(&json).context("Failed to deserialize events")?;
    Ok(events)
}

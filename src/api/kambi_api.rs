use crate::config::Config;
use crate::models::{RawEventEnvelope, TreeNode};
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

const GROUPS_QUERY: &str = r#"
query getGroups($sport: String!, $offering: String!, $market: String!, $language: String!) {
    groups(
        sport: $sport
        groupInternationalGroups: true
        addAllSubGroupsToTopLeagues: true
        offering: $offering
        market: $market
        language: $language
    ) {
        groups {
            name
            level
            id
            countryCode
            abbreviation
            path
            groups {
                name
                id
                level
                path
            }
        }
        topLeagues {
            id
            name
            sortOrder
            countryCode
            path
        }
    }
}
"#;

/// Offering listing (`group.json`)
#[derive(Debug, Default, Deserialize)]
struct OfferingResponse {
    #[serde(default)]
    group: Option<OfferingGroup>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfferingGroup {
    #[serde(default)]
    groups: Vec<SportGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SportGroup {
    term_key: Option<String>,
}

/// A URL that contributed no events
#[derive(Debug, Clone)]
pub struct FetchFailure {
    pub url: String,
    pub reason: String,
}

/// Outcome of one bounded fan-out over event list URLs
#[derive(Debug, Default)]
pub struct FetchBatch {
    pub events: Vec<RawEventEnvelope>,
    pub failures: Vec<FetchFailure>,
}

pub struct KambiClient {
    config: Config,
    client: reqwest::Client,
}

impl KambiClient {
    /// One pooled client shared by every request of the run
    pub fn new(config: Config) -> Result<Self> {
        let config = config.normalized();
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(config.concurrency)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch the sport labels (`termKey`) listed for the offering
    pub async fn fetch_sports(&self) -> Result<Vec<String>> {
        let url = format!(
            "{}{}/group.json",
            self.config.base_url, self.config.offering
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lang", self.config.language.as_str()),
                ("market", self.config.market.as_str()),
            ])
            .send()
            .await
            .context("Failed to fetch offering groups")?;

        if !response.status().is_success() {
            anyhow::bail!("Offering groups returned error: {}", response.status());
        }

        let listing: OfferingResponse = response
            .json()
            .await
            .context("Failed to parse offering groups")?;

        Ok(listing
            .group
            .map(|group| group.groups)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|sport| sport.term_key)
            .collect())
    }

    /// Run the groups query for one sport and decode the whole response
    /// into a category tree
    pub async fn fetch_category_tree(&self, sport: &str) -> Result<TreeNode> {
        let payload = json!({
            "query": GROUPS_QUERY,
            "variables": {
                "sport": sport,
                "offering": self.config.offering,
                "language": self.config.language,
                "market": self.config.market,
            }
        });

        let response = self
            .client
            .post(&self.config.graphql_url)
            .header("Accept", "*/*")
            .header("authorization", "kambi")
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("Failed to fetch groups for {}", sport))?;

        if !response.status().is_success() {
            anyhow::bail!("Groups query for {} returned error: {}", sport, response.status());
        }

        let body: Value = response
            .json()
            .await
            .with_context(|| format!("Failed to parse groups for {}", sport))?;

        Ok(TreeNode::from_value(&body).unwrap_or(TreeNode::Group(Vec::new())))
    }

    /// Fetch every URL with at most `concurrency` requests in flight.
    ///
    /// A failing URL is logged and recorded in `failures`; it never aborts
    /// the batch. Results are merged once all requests have completed.
    pub async fn fetch_events(&self, urls: &[String]) -> FetchBatch {
        let results: Vec<(String, Result<Vec<RawEventEnvelope>>)> = stream::iter(urls)
            .map(|url| async move { (url.clone(), self.fetch_event_list(url).await) })
            .buffer_unordered(self.config.concurrency)
            .collect()
            .await;

        let mut batch = FetchBatch::default();
        for (url, result) in results {
            match result {
                Ok(mut events) => batch.events.append(&mut events),
                Err(e) => {
                    warn!("Failed to fetch {}: {:#}", url, e);
                    batch.failures.push(FetchFailure {
                        url,
                        reason: format!("{:#}", e),
                    });
                }
            }
        }
        batch
    }

    async fn fetch_event_list(&self, url: &str) -> Result<Vec<RawEventEnvelope>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("status {}", response.status());
        }

        let body: Value = response.json().await.context("malformed body")?;
        Ok(decode_events(&body))
    }
}

/// Decode each element of `events` on its own so one malformed envelope
/// does not drop the rest of the list
pub fn decode_events(body: &Value) -> Vec<RawEventEnvelope> {
    body.get("events")
        .and_then(Value::as_array)
        .map(|events| {
            events
                .iter()
                .filter_map(|raw| match RawEventEnvelope::deserialize(raw) {
                    Ok(envelope) => Some(envelope),
                    Err(e) => {
                        debug!("Skipping malformed event envelope: {}", e);
                        None
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

pub const DEFAULT_BASE_URL: &str = "https://eu1.offering-api.kambicdn.com/offering/v2018/";
pub const DEFAULT_GRAPHQL_URL: &str = "https://graphql.kambicdn.com/";
pub const DEFAULT_LANGUAGE: &str = "lv_LV";
pub const DEFAULT_MARKET: &str = "LV";
pub const DEFAULT_CONCURRENCY: usize = 50;

/// Settings for one snapshot run
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider offering identifier, e.g. "paflv"
    pub offering: String,
    pub base_url: String,
    pub graphql_url: String,
    pub language: String,
    pub market: String,
    /// Maximum number of in-flight event list requests
    pub concurrency: usize,
    /// Directory holding `events_<offering>.db`
    pub output_dir: String,
    /// Discard any prior store for the offering before the run
    pub reset_store: bool,
}

impl Config {
    pub fn new(offering: impl Into<String>) -> Self {
        Self {
            offering: offering.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            market: DEFAULT_MARKET.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            output_dir: ".".to_string(),
            reset_store: true,
        }
    }

    /// Trailing slash on the base URL and a non-zero concurrency limit
    pub fn normalized(mut self) -> Self {
        if !self.base_url.ends_with('/') {
            self.base_url.push('/');
        }
        self.concurrency = self.concurrency.max(1);
        self
    }

    pub fn db_file_name(&self) -> String {
        format!("events_{}.db", self.offering)
    }
}

use std::env;
use std::time::Duration;

pub const DEFAULT_REPLICATE_API_BASE: &str = "https://api.replicate.com/v1";
pub const DEFAULT_SEARCH_API_BASE: &str = "https://serpapi.com";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_POLL_TIMEOUT_MS: u64 = 120_000;

/// Replicate connection settings. The token is optional here so the process
/// can boot without a credential; calls fail with a 401-mapped error instead.
#[derive(Debug, Clone)]
pub struct ReplicateConfig {
    pub api_token: Option<String>,
    pub api_base: String,
    pub poll_interval: Duration,
    pub poll_timeout: Duration,
}

impl Default for ReplicateConfig {
    fn default() -> Self {
        ReplicateConfig {
            api_token: None,
            api_base: DEFAULT_REPLICATE_API_BASE.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            poll_timeout: Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS),
        }
    }
}

impl ReplicateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_token = env::var("REPLICATE_API_TOKEN").ok().filter(|t| !t.is_empty());
        let api_base = env::var("REPLICATE_API_BASE")
            .ok()
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_REPLICATE_API_BASE.to_string());
        let poll_interval = env::var("REPLICATE_POLL_INTERVAL_MS")
            .ok()
            .and_then(|ms| ms.parse().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);
        let poll_timeout = env::var("REPLICATE_POLL_TIMEOUT_MS")
            .ok()
            .and_then(|ms| ms.parse().ok())
            .unwrap_or(DEFAULT_POLL_TIMEOUT_MS);

        ReplicateConfig {
            api_token,
            api_base,
            poll_interval: Duration::from_millis(poll_interval),
            poll_timeout: Duration::from_millis(poll_timeout),
        }
    }

    pub fn with_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = Some(api_token.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = interval;
        self.poll_timeout = timeout;
        self
    }
}

/// SerpAPI video search settings. The key always comes from configuration,
/// never from source.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub api_key: Option<String>,
    pub api_base: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            api_key: None,
            api_base: DEFAULT_SEARCH_API_BASE.to_string(),
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("SEARCH_API_KEY").ok().filter(|k| !k.is_empty());
        let api_base = env::var("SEARCH_API_BASE")
            .ok()
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_SEARCH_API_BASE.to_string());

        SearchConfig { api_key, api_base }
    }

    pub fn with_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Dimension constraints the target models impose on input images.
/// Model-specific, so configuration rather than constants in the normalizer.
#[derive(Debug, Clone, Copy)]
pub struct DimensionBounds {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl Default for DimensionBounds {
    fn default() -> Self {
        DimensionBounds {
            min: Some(256),
            max: Some(1024),
        }
    }
}

impl DimensionBounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min(mut self, min: u32) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: u32) -> Self {
        self.max = Some(max);
        self
    }

    pub fn min_only(min: u32) -> Self {
        DimensionBounds {
            min: Some(min),
            max: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub port: Option<u16>,
    pub replicate: ReplicateConfig,
    pub search: SearchConfig,
    pub bounds: DimensionBounds,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let port = env::var("PORT").ok().and_then(|port| port.parse().ok());

        Config {
            port,
            replicate: ReplicateConfig::from_env(),
            search: SearchConfig::from_env(),
            bounds: DimensionBounds::default(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_replicate(mut self, config: ReplicateConfig) -> Self {
        self.replicate = config;
        self
    }

    pub fn with_search(mut self, config: SearchConfig) -> Self {
        self.search = config;
        self
    }

    pub fn with_bounds(mut self, bounds: DimensionBounds) -> Self {
        self.bounds = bounds;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replicate_defaults() {
        let config = ReplicateConfig::new();
        assert!(config.api_token.is_none());
        assert_eq!(config.api_base, DEFAULT_REPLICATE_API_BASE);
        assert_eq!(config.poll_interval, Duration::from_millis(1000));
        assert_eq!(config.poll_timeout, Duration::from_millis(120_000));
    }

    #[test]
    fn test_builder_chain() {
        let config = Config::new()
            .with_port(3000)
            .with_replicate(ReplicateConfig::new().with_token("r8_test"))
            .with_search(SearchConfig::new().with_key("serp_test"))
            .with_bounds(DimensionBounds::min_only(512));

        assert_eq!(config.port, Some(3000));
        assert_eq!(config.replicate.api_token.as_deref(), Some("r8_test"));
        assert_eq!(config.search.api_key.as_deref(), Some("serp_test"));
        assert_eq!(config.bounds.min, Some(512));
        assert_eq!(config.bounds.max, None);
    }

    #[test]
    fn test_api_base_trailing_slash_trimmed() {
        let config = ReplicateConfig::new().with_api_base("https://example.com/v1/");
        assert_eq!(config.api_base, "https://example.com/v1");
    }
}

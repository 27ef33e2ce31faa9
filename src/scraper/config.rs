use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the browser-driven page fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Per-request timeout in seconds (default: 60)
    pub timeout_secs: u64,

    /// Wait time after page load for dynamic content in milliseconds (default: 1000)
    pub wait_after_load_ms: u64,

    /// Maximum concurrent product tabs (default: 5)
    pub max_concurrency: usize,

    /// How long to wait for the displayed price to change after selecting an
    /// option, in milliseconds (default: 6000)
    pub price_settle_timeout_ms: u64,

    /// Poll interval while waiting for the price to settle (default: 100)
    pub price_poll_interval_ms: u64,

    /// Probe the live page per option once an axis has this many options (default: 3)
    pub probe_threshold: usize,

    /// Browser window size
    pub window_width: u32,
    pub window_height: u32,

    /// User agent string to use
    pub user_agent: Option<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            headless: true,
            timeout_secs: 60,
            wait_after_load_ms: 1000,
            max_concurrency: 5,
            price_settle_timeout_ms: 6000,
            price_poll_interval_ms: 100,
            probe_threshold: 3,
            window_width: 1440,
            window_height: 1000,
            user_agent: Some(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
            ),
        }
    }
}

impl ScraperConfig {
    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the wait time after load as a Duration
    pub fn wait_after_load(&self) -> Duration {
        Duration::from_millis(self.wait_after_load_ms)
    }

    pub fn price_settle_timeout(&self) -> Duration {
        Duration::from_millis(self.price_settle_timeout_ms)
    }

    pub fn price_poll_interval(&self) -> Duration {
        Duration::from_millis(self.price_poll_interval_ms.max(1))
    }
}

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://app.aixblock.io";
pub const DEFAULT_API_URL: &str = "https://api.aixblock.io";
pub const DEFAULT_REPORT_PATH: &str = "vulnerability_report.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub base_url: String,
    pub api_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Accept invalid TLS certificates (lab targets with self-signed certs)
    pub insecure: bool,
    pub report_path: PathBuf,
    pub cookies: HashMap<String, String>,
    pub bearer_token: Option<String>,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Number of login requests fired in the concurrent flood
    pub concurrent_requests: usize,
    /// Upper bound on requests in flight at once
    pub max_in_flight: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 10,
            insecure: false,
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            cookies: HashMap::new(),
            bearer_token: None,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { concurrent_requests: 50, max_in_flight: 50 }
    }
}

impl RateLimitConfig {
    /// Resize the flood, widening `max_in_flight` so all `n` requests still go out together.
    pub fn set_flood_size(&mut self, n: usize) {
        self.concurrent_requests = n;
        self.max_in_flight = self.max_in_flight.max(n);
    }
}

impl ProbeConfig {
    /// Load a JSON config file; missing keys fall back to defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Config pointing both URLs at one origin, as used against stub servers.
    pub fn for_target(url: &str) -> Self {
        Self {
            base_url: url.to_string(),
            api_url: url.to_string(),
            ..Self::default()
        }
    }
}

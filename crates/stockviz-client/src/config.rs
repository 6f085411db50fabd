// File: crates/stockviz-client/src/config.rs
// Summary: Client configuration with environment overrides.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const ENV_API_BASE: &str = "STOCKVIZ_API_BASE";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin the `/api/...` paths are resolved against.
    pub base_url: String,
    /// Whole-request timeout; none by default.
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), timeout_secs: None }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    /// Defaults, then `STOCKVIZ_API_BASE` if set.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base) = std::env::var(ENV_API_BASE) {
            if !base.trim().is_empty() {
                self.base_url = base.trim().to_string();
            }
        }
        self
    }
}

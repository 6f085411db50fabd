// File: crates/stockviz-demo/src/settings.rs
// Summary: Demo settings loaded from `stockviz.json`, then overridden from the environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use stockviz_client::ClientConfig;
use stockviz_core::{theme, Locale, Theme};

pub const SETTINGS_FILE: &str = "stockviz.json";

pub const ENV_LOCALE: &str = "STOCKVIZ_LOCALE";
pub const ENV_THEME: &str = "STOCKVIZ_THEME";
pub const ENV_OUT_DIR: &str = "STOCKVIZ_OUT_DIR";
pub const ENV_LOG: &str = "STOCKVIZ_LOG";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ClientConfig,
    /// `vi-VN` or `en-US`.
    pub locale: String,
    /// Theme preset name.
    pub theme: String,
    pub out_dir: PathBuf,
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub log: String,
    /// Client width of every chart container.
    pub width: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ClientConfig::default(),
            locale: "vi-VN".to_string(),
            theme: "light".to_string(),
            out_dir: PathBuf::from("target/out"),
            log: "info".to_string(),
            width: 800,
        }
    }
}

impl Settings {
    /// `stockviz.json` in the working directory if present, then env overrides.
    pub fn load() -> Result<Self> {
        let settings = Self::from_file(Path::new(SETTINGS_FILE))?.unwrap_or_default();
        Ok(settings.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// `None` when the file does not exist.
    pub fn from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let settings = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(settings))
    }

    /// Apply `STOCKVIZ_*` variables looked up through `var`; blank values are ignored.
    pub fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        if let Some(base) = get(stockviz_client::config::ENV_API_BASE) {
            self.api.base_url = base;
        }
        if let Some(locale) = get(ENV_LOCALE) {
            self.locale = locale;
        }
        if let Some(name) = get(ENV_THEME) {
            self.theme = name;
        }
        if let Some(dir) = get(ENV_OUT_DIR) {
            self.out_dir = PathBuf::from(dir);
        }
        if let Some(filter) = get(ENV_LOG) {
            self.log = filter;
        }
        self
    }

    pub fn locale(&self) -> Locale {
        Locale::from_tag(&self.locale)
    }

    pub fn theme(&self) -> Theme {
        theme::find(&self.theme)
    }
}

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for the catalog browser
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub contact: ContactConfig,

    #[serde(default)]
    pub offline: OfflineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    /// International format without the leading `+`
    #[serde(default = "default_phone")]
    pub phone: String,

    #[serde(default = "default_business_name")]
    pub business_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineConfig {
    #[serde(default = "default_cache_name")]
    pub cache_name: String,

    #[serde(default = "default_origin")]
    pub origin: String,

    #[serde(default = "default_precache")]
    pub precache: Vec<String>,

    #[serde(default = "default_bypass_hosts")]
    pub bypass_hosts: Vec<String>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            phone: default_phone(),
            business_name: default_business_name(),
        }
    }
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            cache_name: default_cache_name(),
            origin: default_origin(),
            precache: default_precache(),
            bypass_hosts: default_bypass_hosts(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

fn default_endpoint() -> String {
    "https://script.google.com/macros/s/AKfycbwt4AroNuGs2gBbI0cgSuFpMExjIfEpnyi1QYRKY9vWWFkv29weCL9z7dTMpyGQbDOusw/exec".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_phone() -> String {
    "919876543210".to_string()
}

fn default_business_name() -> String {
    "Modern Ply Gallery".to_string()
}

fn default_cache_name() -> String {
    "ply-gallery-cache-v2".to_string()
}

fn default_origin() -> String {
    "http://localhost:8000".to_string()
}

fn default_precache() -> Vec<String> {
    vec![
        "/".to_string(),
        "/index.html".to_string(),
        "/style.css?v=2".to_string(),
        "/script.js?v=2".to_string(),
        "/manifest.json".to_string(),
    ]
}

fn default_bypass_hosts() -> Vec<String> {
    vec![
        "cdn.tailwindcss.com".to_string(),
        "cdnjs.cloudflare.com".to_string(),
    ]
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, writing the defaults there first if it is missing
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(path, content)?;
            Ok(config)
        }
    }

    /// Reject values that would make the pipeline unusable
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api.endpoint.trim().is_empty() {
            anyhow::bail!("[api] endpoint must not be empty");
        }
        if self.api.timeout_secs == 0 {
            anyhow::bail!("[api] timeout_secs must be greater than zero");
        }
        if self.offline.cache_name.trim().is_empty() {
            anyhow::bail!("[offline] cache_name must not be empty");
        }
        Ok(())
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "plygallery", "catalog") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.catalog/config.toml")
        }
    }
}

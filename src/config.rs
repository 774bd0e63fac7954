use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Env var naming the YAML config file.
pub const CONFIG_ENV: &str = "TINYHTTPD_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "tinyhttpd.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
    pub network: NetworkConfig,
    pub variables: VariablesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Value of the `Server:` response header.
    pub name: String,
    pub read_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory containing the `web/` webroot.
    pub root: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Optional link/network settings file, see [`crate::netconfig`].
    pub config_file: Option<PathBuf>,
}

/// Argument names, in table order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VariablesConfig {
    pub query: Vec<String>,
    pub form: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            name: "tinyhttpd".to_string(),
            read_timeout_secs: None,
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./public"),
        }
    }
}

impl Config {
    /// Load the config file named by `TINYHTTPD_CONFIG` (or the default
    /// path), then apply the `LISTEN` override. A missing file means the
    /// built-in defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let cfg = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        Ok(cfg.with_env_overrides())
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(addr) = std::env::var("LISTEN") {
            self.server.listen_addr = addr;
        }
        self
    }
}

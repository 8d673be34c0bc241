//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.logproxy/config.json`) and environment.
//! The messages API url and key may come from either; env wins.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::messages::RelaySettings;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Remote messages API settings.
    #[serde(default)]
    pub messages: MessagesApiConfig,

    /// Local HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Remote messages API endpoint and bearer token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesApiConfig {
    /// Full URL of the messages resource. Overridden by LOGPROXY_MESSAGES_API_URL env.
    pub api_url: Option<String>,

    /// Bearer token sent on every request. Overridden by LOGPROXY_MESSAGES_API_KEY env.
    pub api_key: Option<String>,

    /// Per-request timeout in seconds. Unset means no timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Gateway bind and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Port for HTTP (default 15152).
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1").
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
}

fn default_gateway_port() -> u16 {
    15152
}

fn default_gateway_bind() -> String {
    "127.0.0.1".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_gateway_bind(),
        }
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    })
}

fn config_non_empty(value: Option<&String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Resolve the messages API url: env LOGPROXY_MESSAGES_API_URL overrides config.
pub fn resolve_messages_api_url(config: &Config) -> Option<String> {
    env_non_empty("LOGPROXY_MESSAGES_API_URL")
        .or_else(|| config_non_empty(config.messages.api_url.as_ref()))
}

/// Resolve the messages API key: env LOGPROXY_MESSAGES_API_KEY overrides config.
pub fn resolve_messages_api_key(config: &Config) -> Option<String> {
    env_non_empty("LOGPROXY_MESSAGES_API_KEY")
        .or_else(|| config_non_empty(config.messages.api_key.as_ref()))
}

/// Build relay settings from config + env. Fails when url or key is missing.
pub fn resolve_relay_settings(config: &Config) -> Result<RelaySettings> {
    let endpoint = resolve_messages_api_url(config).context(
        "messages api url not configured (set messages.apiUrl or LOGPROXY_MESSAGES_API_URL)",
    )?;
    let api_key = resolve_messages_api_key(config).context(
        "messages api key not configured (set messages.apiKey or LOGPROXY_MESSAGES_API_KEY)",
    )?;
    Ok(RelaySettings {
        endpoint,
        api_key,
        timeout: config
            .messages
            .timeout_secs
            .filter(|s| *s > 0)
            .map(Duration::from_secs),
    })
}

/// True if the bind address is loopback (127.0.0.1, ::1, etc.).
pub fn is_loopback_bind(bind: &str) -> bool {
    let b = bind.trim();
    b == "127.0.0.1" || b == "::1" || b == "localhost"
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("LOGPROXY_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".logproxy").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the given path, LOGPROXY_CONFIG_PATH, or the default.
/// Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}

const CONFIG_TEMPLATE: &str = r#"{
  "messages": {
    "apiUrl": "https://example.com/api/messages",
    "apiKey": "",
    "timeoutSecs": 30
  },
  "gateway": {
    "bind": "127.0.0.1",
    "port": 15152
  }
}
"#;

/// Create the config directory and write a template config if none exists.
/// Returns true when a new file was written.
pub fn init_config(config_path: &Path) -> Result<bool> {
    let config_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("creating config directory {}", config_dir.display()))?;

    if config_path.exists() {
        log::debug!("config already exists at {}, skipping", config_path.display());
        return Ok(false);
    }
    std::fs::write(config_path, CONFIG_TEMPLATE)
        .with_context(|| format!("writing default config to {}", config_path.display()))?;
    log::info!("created default config at {}", config_path.display());
    Ok(true)
}

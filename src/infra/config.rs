// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub workspace: WorkspaceConfig,

    #[serde(default)]
    pub peers: PeersConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub bind: String,
    /// Directory holding the browser client bundle, served on the
    /// catch-all route. When unset the API runs headless.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 18791,
            bind: "127.0.0.1".into(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Workspace root; AGENTDECK_WORKSPACE overrides this.
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeersConfig {
    pub gateway_url: String,
    pub watcher_url: String,
    /// Reachability probe timeout, seconds.
    pub probe_timeout_secs: u64,
    /// Scheduler API timeout, seconds.
    pub cron_timeout_secs: u64,
}

impl Default for PeersConfig {
    fn default() -> Self {
        Self {
            gateway_url: "http://127.0.0.1:18789".into(),
            watcher_url: "http://127.0.0.1:18790".into(),
            probe_timeout_secs: 2,
            cron_timeout_secs: 3,
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults when no
    /// config.toml exists.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&paths::config_file_path())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("invalid config at {}: {e}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 18791);
        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.peers.probe_timeout_secs, 2);
        assert_eq!(config.peers.cron_timeout_secs, 3);
        assert!(config.workspace.root.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let raw = r#"
[server]
port = 9000
bind = "0.0.0.0"

[peers]
gateway_url = "http://10.0.0.2:18789"
watcher_url = "http://10.0.0.2:18790"
probe_timeout_secs = 2
cron_timeout_secs = 5
"#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.peers.cron_timeout_secs, 5);
        // Missing [workspace] section falls back to default
        assert!(config.workspace.root.is_none());
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let config = Config::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.server.port, 18791);
    }
}

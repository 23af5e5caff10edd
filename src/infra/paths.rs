// src/infra/paths.rs — Workspace path management
//
// All reads go through a Workspace rooted at AGENTDECK_WORKSPACE when that
// env var is set, falling back to a config-supplied root and finally to
// ~/.agentdeck/workspace. The workspace is owned and written by the agent
// process; this crate never creates or mutates anything under it.

use std::path::{Path, PathBuf};

/// Read-only view of the agent's workspace directory tree.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Resolve the workspace root: env override > config > default.
    pub fn resolve(config_root: Option<&Path>) -> Self {
        if let Some(root) = std::env::var_os("AGENTDECK_WORKSPACE") {
            return Self::from_root(PathBuf::from(root));
        }
        if let Some(root) = config_root {
            return Self::from_root(root.to_path_buf());
        }
        Self::from_root(home_dir().join(".agentdeck").join("workspace"))
    }

    pub fn from_root(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn memory_dir(&self) -> PathBuf {
        self.root.join("memory")
    }

    /// Structured heartbeat snapshot written by the agent.
    pub fn heartbeat_state(&self) -> PathBuf {
        self.memory_dir().join("heartbeat-state.json")
    }

    /// Line-oriented heartbeat activity log.
    pub fn heartbeat_log(&self) -> PathBuf {
        self.memory_dir().join("heartbeat-log.md")
    }

    /// Section-tagged task document.
    pub fn todo(&self) -> PathBuf {
        self.root.join("TODO.md")
    }

    pub fn curiosity(&self) -> PathBuf {
        self.memory_dir().join("curiosity.md")
    }

    pub fn briefing(&self) -> PathBuf {
        self.memory_dir().join("morning-briefing.md")
    }

    pub fn research_dir(&self) -> PathBuf {
        self.memory_dir().join("research")
    }

    pub fn writing_dir(&self) -> PathBuf {
        self.memory_dir().join("writing")
    }

    /// Bearer credential forwarded to the scheduler API.
    pub fn hook_token(&self) -> PathBuf {
        self.root.join(".hook-token")
    }
}

/// Home directory
pub fn home_dir() -> PathBuf {
    directories::BaseDirs::new()
        .expect("Could not determine home directory")
        .home_dir()
        .to_path_buf()
}

/// Config file path: ~/.agentdeck/config.toml
pub fn config_file_path() -> PathBuf {
    home_dir().join(".agentdeck").join("config.toml")
}

/// Fallback cache written by the peer scheduler: ~/.agentdeck/cron-state.json
pub fn cron_fallback_path() -> PathBuf {
    home_dir().join(".agentdeck").join("cron-state.json")
}

// src/signal/cron.rs — Scheduled-job view (read-through, no write path)
//
// The scheduler peer owns the jobs. We ask it first, carrying the bearer
// credential from the workspace; if the peer is down we fall back to its
// last cache file on disk and accept whatever staleness that implies.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::infra::config::PeersConfig;
use crate::infra::paths::Workspace;
use crate::reader::{peer, read_json_safe, read_text_safe};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Schedule {
    Cron {
        expr: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tz: Option<String>,
    },
    Every {
        #[serde(rename = "everyMs")]
        every_ms: u64,
    },
    At {
        #[serde(rename = "atMs")]
        at_ms: i64,
    },
    /// New schedule kinds can appear upstream without warning.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CronJob {
    pub id: Option<String>,
    pub name: Option<String>,
    pub enabled: Option<bool>,
    pub schedule: Option<Schedule>,
    pub session_target: Option<String>,
    pub payload: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CronState {
    pub jobs: Vec<CronJob>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Fetch the job list: scheduler API first, cache file second, and an
/// annotated empty list when both are gone.
pub async fn load_crons(
    client: &reqwest::Client,
    peers: &PeersConfig,
    workspace: &Workspace,
    fallback: &Path,
) -> CronState {
    let token = read_text_safe(&workspace.hook_token())
        .await
        .map(|t| t.trim().to_string())
        .unwrap_or_default();
    let url = format!("{}/api/cron", peers.gateway_url.trim_end_matches('/'));
    let timeout = Duration::from_secs(peers.cron_timeout_secs);

    if let Some(state) = peer::get_json::<CronState>(client, &url, Some(&token), timeout).await {
        return state;
    }

    if let Some(state) = read_json_safe::<CronState>(fallback).await {
        return state;
    }

    CronState {
        jobs: Vec::new(),
        note: Some("Could not reach scheduler API".into()),
    }
}

// src/parse/heartbeat.rs — Heartbeat snapshot types and log grammar

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Activity mode reported by the agent. The writer treats this as an
/// open-ended string, so unrecognized values land in `Other` instead of
/// failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mode {
    Idle,
    Monitor,
    Build,
    Research,
    Create,
    Reflect,
    Other(String),
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Idle
    }
}

impl From<String> for Mode {
    fn from(s: String) -> Self {
        match s.as_str() {
            "idle" => Mode::Idle,
            "monitor" => Mode::Monitor,
            "build" => Mode::Build,
            "research" => Mode::Research,
            "create" => Mode::Create,
            "reflect" => Mode::Reflect,
            _ => Mode::Other(s),
        }
    }
}

impl From<Mode> for String {
    fn from(m: Mode) -> Self {
        m.as_str().to_string()
    }
}

impl Mode {
    pub fn as_str(&self) -> &str {
        match self {
            Mode::Idle => "idle",
            Mode::Monitor => "monitor",
            Mode::Build => "build",
            Mode::Research => "research",
            Mode::Create => "create",
            Mode::Reflect => "reflect",
            Mode::Other(s) => s,
        }
    }
}

/// Sub-agent spawn entry inside the heartbeat snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spawn {
    pub label: Option<String>,
    pub task: Option<String>,
    /// Timestamp in whatever unit the writer used; displayed, never computed on.
    pub started: Option<serde_json::Value>,
}

/// Insight recorded by the agent. Upstream defines the ordering; this
/// crate never re-sorts the list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Insight {
    pub timestamp: Option<serde_json::Value>,
    pub insight: String,
}

/// Snapshot of the agent's heartbeat state document.
///
/// Owned and mutated entirely by the external agent process; one request
/// reads it exactly once and treats the snapshot as immutable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeartbeatState {
    pub current_mode: Mode,
    pub current_task: Option<String>,
    /// Epoch timestamp; see `last_heartbeat_secs` for the unit rule.
    pub last_heartbeat: i64,
    pub consecutive_idle_beats: u32,
    pub active_spawns: Vec<Spawn>,
    pub recent_insights: Vec<Insight>,
    pub last_checks: HashMap<String, serde_json::Value>,
}

/// Values above this are epoch milliseconds, not seconds.
const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

impl HeartbeatState {
    /// Canonical heartbeat timestamp in epoch seconds.
    ///
    /// The writer has emitted both seconds and milliseconds over time;
    /// normalization happens here, once, so no other reader guesses.
    pub fn last_heartbeat_secs(&self) -> i64 {
        if self.last_heartbeat > MILLIS_THRESHOLD {
            self.last_heartbeat / 1000
        } else {
            self.last_heartbeat
        }
    }

    /// Minutes since the last heartbeat, clamped at zero for clock skew.
    pub fn heartbeat_age_minutes(&self, now_secs: i64) -> i64 {
        ((now_secs - self.last_heartbeat_secs()) / 60).max(0)
    }
}

/// One structured entry from the heartbeat log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeartbeatLogEntry {
    pub timestamp: String,
    pub mode: String,
    pub action: String,
}

static LOG_LINE: OnceLock<Regex> = OnceLock::new();

fn log_line_re() -> &'static Regex {
    LOG_LINE.get_or_init(|| {
        Regex::new(r"^- \[(\d{4}-\d{2}-\d{2} \d{2}:\d{2})\] mode=(\w+) \| action: (.+)$")
            .expect("log line regex")
    })
}

/// Parse the heartbeat log into entries, newest first.
///
/// The log interleaves structured lines with narrative prose; anything
/// that does not match the grammar is dropped without comment.
pub fn parse_log(raw: &str) -> Vec<HeartbeatLogEntry> {
    let mut entries: Vec<HeartbeatLogEntry> = raw
        .lines()
        .filter_map(|line| {
            log_line_re().captures(line).map(|c| HeartbeatLogEntry {
                timestamp: c[1].to_string(),
                mode: c[2].to_string(),
                action: c[3].to_string(),
            })
        })
        .collect();
    entries.reverse();
    entries
}

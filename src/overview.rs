// src/overview.rs — Overview aggregator
//
// One fan-out per request: every reader runs concurrently and degrades
// internally, so the join itself cannot fail. The heartbeat snapshot is
// read exactly once; mood and insights both derive from that one read so
// they can never disagree about what the agent was doing.

use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;

use crate::infra::config::{Config, PeersConfig};
use crate::infra::paths::{self, Workspace};
use crate::parse::docs::{self, ResearchFile, WritingPost};
use crate::parse::heartbeat::{self, HeartbeatLogEntry, HeartbeatState, Insight};
use crate::parse::todo::{self, TodoSections};
use crate::reader::{read_json_safe, read_text_safe};
use crate::signal::health::{self, SystemHealth};
use crate::signal::mood::{self, MoodResult};

/// Most recent log entries included in the overview.
const LOG_LIMIT: usize = 20;

/// Everything a request handler needs, shared across requests. Holds no
/// mutable state; each overview is computed from durable storage and
/// peers from scratch.
#[derive(Debug, Clone)]
pub struct DeckContext {
    pub workspace: Workspace,
    pub peers: PeersConfig,
    pub cron_fallback: PathBuf,
    pub client: reqwest::Client,
}

impl DeckContext {
    pub fn new(config: &Config) -> Self {
        Self {
            workspace: Workspace::resolve(config.workspace.root.as_deref()),
            peers: config.peers.clone(),
            cron_fallback: paths::cron_fallback_path(),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HeartbeatSection {
    pub state: HeartbeatState,
    pub log: Vec<HeartbeatLogEntry>,
}

/// Research entry as it appears in the overview: metadata only, no preview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchMeta {
    pub file: String,
    pub title: String,
    pub word_count: usize,
    pub modified: String,
}

impl From<&ResearchFile> for ResearchMeta {
    fn from(f: &ResearchFile) -> Self {
        Self {
            file: f.file.clone(),
            title: f.title.clone(),
            word_count: f.word_count,
            modified: f.modified.clone(),
        }
    }
}

/// The consolidated document the dashboard polls for.
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub timestamp: String,
    pub heartbeat: HeartbeatSection,
    pub todo: TodoSections,
    pub research: Vec<ResearchMeta>,
    pub insights: Vec<Insight>,
    pub system: SystemHealth,
    pub writings: Vec<WritingPost>,
    pub mood: MoodResult,
}

/// Build one overview document. Never fails: every source degrades to an
/// empty or error-marked section on its own.
pub async fn build_overview(ctx: &DeckContext) -> Overview {
    let ws = &ctx.workspace;

    let heartbeat_state_path = ws.heartbeat_state();
    let heartbeat_log_path = ws.heartbeat_log();
    let todo_path = ws.todo();
    let research_dir = ws.research_dir();
    let writing_dir = ws.writing_dir();

    let (state, log_raw, todo_raw, research, writings, system) = tokio::join!(
        read_json_safe::<HeartbeatState>(&heartbeat_state_path),
        read_text_safe(&heartbeat_log_path),
        read_text_safe(&todo_path),
        docs::load_research(&research_dir),
        docs::load_writings(&writing_dir),
        health::collect_health(&ctx.client, &ctx.peers),
    );

    let state = state.unwrap_or_default();
    let mut log = heartbeat::parse_log(&log_raw.unwrap_or_default());
    log.truncate(LOG_LIMIT);

    let mood = mood::infer_mood(&state, Utc::now().timestamp());
    let insights = state.recent_insights.clone();

    Overview {
        timestamp: Utc::now().to_rfc3339(),
        heartbeat: HeartbeatSection { state, log },
        todo: todo::parse_todo(&todo_raw.unwrap_or_default()),
        research: research.iter().map(ResearchMeta::from).collect(),
        insights,
        system,
        writings,
        mood,
    }
}

// src/api/handlers.rs
//
// Each handler is a thin adapter over one reader or engine. The readers
// degrade internally, so these cannot fail; the browser client decides
// how to render an empty section.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use crate::api::{types::*, ApiState};
use crate::overview::{self, Overview};
use crate::parse::docs::{self, DailyEntry, NoteDoc, ResearchFile, WritingPost};
use crate::parse::heartbeat::{self, HeartbeatState, Insight};
use crate::parse::todo;
use crate::reader::{read_json_safe, read_text_safe};
use crate::signal::cron::{self, CronState};
use crate::signal::health::{self, SystemHealth};
use crate::signal::mood;

async fn load_state(state: &ApiState) -> HeartbeatState {
    read_json_safe(&state.ctx.workspace.heartbeat_state())
        .await
        .unwrap_or_default()
}

/// GET /api/overview — the consolidated document, built fresh per poll.
pub async fn overview(State(state): State<ApiState>) -> Json<Overview> {
    Json(overview::build_overview(&state.ctx).await)
}

/// GET /api/heartbeat/state
pub async fn heartbeat_state(State(state): State<ApiState>) -> Json<HeartbeatState> {
    Json(load_state(&state).await)
}

/// GET /api/heartbeat/log
pub async fn heartbeat_log(State(state): State<ApiState>) -> Json<LogResponse> {
    let raw = read_text_safe(&state.ctx.workspace.heartbeat_log())
        .await
        .unwrap_or_default();
    Json(LogResponse {
        entries: heartbeat::parse_log(&raw),
        raw,
    })
}

/// GET /api/todo
pub async fn todo(State(state): State<ApiState>) -> Json<TodoResponse> {
    let raw = read_text_safe(&state.ctx.workspace.todo())
        .await
        .unwrap_or_default();
    Json(TodoResponse {
        sections: todo::parse_todo(&raw),
        raw,
    })
}

/// GET /api/research
pub async fn research(State(state): State<ApiState>) -> Json<Vec<ResearchFile>> {
    Json(docs::load_research(&state.ctx.workspace.research_dir()).await)
}

/// GET /api/writings
pub async fn writings(State(state): State<ApiState>) -> Json<Vec<WritingPost>> {
    Json(docs::load_writings(&state.ctx.workspace.writing_dir()).await)
}

/// GET /api/crons
pub async fn crons(State(state): State<ApiState>) -> Json<CronState> {
    let ctx = &state.ctx;
    Json(cron::load_crons(&ctx.client, &ctx.peers, &ctx.workspace, &ctx.cron_fallback).await)
}

/// GET /api/insights — insight list from the heartbeat snapshot.
pub async fn insights(State(state): State<ApiState>) -> Json<Vec<Insight>> {
    Json(load_state(&state).await.recent_insights)
}

/// GET /api/curiosity
pub async fn curiosity(State(state): State<ApiState>) -> Json<NoteDoc> {
    Json(docs::load_note(&state.ctx.workspace.curiosity()).await)
}

/// GET /api/daily — the last week of daily memory files.
pub async fn daily(State(state): State<ApiState>) -> Json<Vec<DailyEntry>> {
    Json(docs::load_daily(&state.ctx.workspace.memory_dir(), docs::DAILY_LIMIT).await)
}

/// GET /api/briefing
pub async fn briefing(State(state): State<ApiState>) -> Json<NoteDoc> {
    Json(docs::load_note(&state.ctx.workspace.briefing()).await)
}

/// GET /api/system
pub async fn system(State(state): State<ApiState>) -> Json<SystemHealth> {
    let ctx = &state.ctx;
    Json(health::collect_health(&ctx.client, &ctx.peers).await)
}

/// Fallback when no static client bundle is configured.
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not Found".into(),
        }),
    )
}

/// GET /api/mood — standalone mood reading, mostly for debugging the
/// classifier from the command line.
pub async fn mood(State(state): State<ApiState>) -> Json<mood::MoodResult> {
    let snapshot = load_state(&state).await;
    Json(mood::infer_mood(&snapshot, Utc::now().timestamp()))
}

// src/api/types.rs

use serde::Serialize;

use crate::parse::heartbeat::HeartbeatLogEntry;
use crate::parse::todo::TodoSections;

/// GET /api/heartbeat/log response: parsed entries plus the raw document
/// for drill-down views.
#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub entries: Vec<HeartbeatLogEntry>,
    pub raw: String,
}

/// GET /api/todo response.
#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub raw: String,
    pub sections: TodoSections,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

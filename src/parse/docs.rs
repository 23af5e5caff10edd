// src/parse/docs.rs — Markdown document metadata
//
// Research notes, authored writing posts, and the free-form note documents
// (curiosity queue, morning briefing, daily memory). These loaders walk a
// directory and summarize each document; a missing directory is an empty
// list, same as everywhere else in this crate.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;

use crate::reader::read_text_safe;
use crate::util::{truncate_str, word_count};

/// How many lines of a research note make up its preview.
const RESEARCH_PREVIEW_LINES: usize = 10;
/// Preview budget for writing posts, in bytes of body text.
const WRITING_PREVIEW_BYTES: usize = 280;
/// How many daily memory files to surface.
pub const DAILY_LIMIT: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchFile {
    pub file: String,
    pub title: String,
    pub word_count: usize,
    /// Modification time, RFC 3339.
    pub modified: String,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingPost {
    pub slug: String,
    pub title: String,
    /// Date prefix of the filename, when present.
    pub date: Option<String>,
    pub word_count: usize,
    pub preview: String,
}

/// Free-form note document, passed through verbatim.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NoteDoc {
    pub raw: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyEntry {
    pub date: String,
    pub content: String,
}

/// First level-1 heading of a document, or `fallback` when none exists.
fn doc_title(content: &str, fallback: &str) -> String {
    content
        .lines()
        .find_map(|l| l.strip_prefix("# "))
        .map(|t| t.trim().to_string())
        .unwrap_or_else(|| fallback.to_string())
}

async fn md_files(dir: &Path) -> Vec<String> {
    let mut rd = match tokio::fs::read_dir(dir).await {
        Ok(rd) => rd,
        Err(_) => return Vec::new(),
    };
    let mut names = Vec::new();
    while let Ok(Some(entry)) = rd.next_entry().await {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.ends_with(".md") {
            names.push(name);
        }
    }
    names
}

/// Summarize research notes, newest modification first.
pub async fn load_research(dir: &Path) -> Vec<ResearchFile> {
    let mut results = Vec::new();
    for name in md_files(dir).await {
        let path = dir.join(&name);
        let content = read_text_safe(&path).await.unwrap_or_default();
        let modified = tokio::fs::metadata(&path)
            .await
            .ok()
            .and_then(|m| m.modified().ok())
            .map(|t| DateTime::<Utc>::from(t).to_rfc3339())
            .unwrap_or_default();
        results.push(ResearchFile {
            title: doc_title(&content, &name),
            word_count: word_count(&content),
            modified,
            preview: content
                .lines()
                .take(RESEARCH_PREVIEW_LINES)
                .collect::<Vec<_>>()
                .join("\n"),
            file: name,
        });
    }
    // RFC 3339 in UTC sorts lexicographically in time order
    results.sort_by(|a, b| b.modified.cmp(&a.modified));
    results
}

static DATE_PREFIX: OnceLock<Regex> = OnceLock::new();

fn date_prefix_re() -> &'static Regex {
    DATE_PREFIX.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("date prefix regex"))
}

/// Summarize writing posts, filename-descending.
///
/// Filenames are date-prefixed by convention, so this ordering is
/// reverse-chronological.
pub async fn load_writings(dir: &Path) -> Vec<WritingPost> {
    let mut results = Vec::new();
    for name in md_files(dir).await {
        let content = read_text_safe(&dir.join(&name)).await.unwrap_or_default();
        let slug = name.trim_end_matches(".md").to_string();
        let title = doc_title(&content, &slug);
        let date = date_prefix_re()
            .find(&slug)
            .map(|m| m.as_str().to_string());

        // Preview is the body after the title line
        let body: String = content
            .lines()
            .filter(|l| l.strip_prefix("# ").map(str::trim) != Some(title.as_str()))
            .collect::<Vec<_>>()
            .join("\n");
        let preview = truncate_str(body.trim(), WRITING_PREVIEW_BYTES).to_string();

        results.push(WritingPost {
            slug,
            title,
            date,
            word_count: word_count(&content),
            preview,
        });
    }
    results.sort_by(|a, b| b.slug.cmp(&a.slug));
    results
}

/// Read a single free-form note; missing file is an empty note.
pub async fn load_note(path: &Path) -> NoteDoc {
    NoteDoc {
        raw: read_text_safe(path).await.unwrap_or_default(),
    }
}

static DAILY_NAME: OnceLock<Regex> = OnceLock::new();

fn daily_name_re() -> &'static Regex {
    DAILY_NAME.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}\.md$").expect("daily name regex"))
}

/// The newest `limit` daily memory files (`YYYY-MM-DD.md`), newest first.
pub async fn load_daily(dir: &Path, limit: usize) -> Vec<DailyEntry> {
    let mut names: Vec<String> = md_files(dir)
        .await
        .into_iter()
        .filter(|n| daily_name_re().is_match(n))
        .collect();
    names.sort();
    names.reverse();
    names.truncate(limit);

    let mut results = Vec::new();
    for name in names {
        let content = read_text_safe(&dir.join(&name)).await.unwrap_or_default();
        results.push(DailyEntry {
            date: name.trim_end_matches(".md").to_string(),
            content,
        });
    }
    results
}

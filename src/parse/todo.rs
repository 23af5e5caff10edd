// src/parse/todo.rs — Section-tagged task document parser

use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::sync::OnceLock;

/// One task line from the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodoTask {
    pub status: String,
    pub title: String,
    pub detail: String,
}

/// Section title → tasks, in document order.
///
/// Serialized as a JSON object whose keys keep insertion order; the UI
/// renders sections in the order they appear in the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoSections(Vec<(String, Vec<TodoTask>)>);

impl TodoSections {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, title: &str) -> Option<&[TodoTask]> {
        self.0
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, tasks)| tasks.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TodoTask])> {
        self.0.iter().map(|(t, tasks)| (t.as_str(), tasks.as_slice()))
    }
}

impl Serialize for TodoSections {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (title, tasks) in &self.0 {
            map.serialize_entry(title, tasks)?;
        }
        map.end()
    }
}

/// Implicit section for task lines that appear before any header.
const TOP_SECTION: &str = "_top";

static HEADER: OnceLock<Regex> = OnceLock::new();
static TASK: OnceLock<Regex> = OnceLock::new();
static DETAIL_SEP: OnceLock<Regex> = OnceLock::new();

fn header_re() -> &'static Regex {
    // Heading levels 1-3 only; deeper headings are body text.
    HEADER.get_or_init(|| Regex::new(r"^#{1,3}\s+(.+)").expect("header regex"))
}

fn task_re() -> &'static Regex {
    TASK.get_or_init(|| Regex::new(r"^- `(\w+)` \| \*\*(.+?)\*\*(.*)$").expect("task regex"))
}

fn detail_sep_re() -> &'static Regex {
    // A single leading em dash, en dash, or hyphen separates title from detail.
    DETAIL_SEP.get_or_init(|| Regex::new(r"^\s*[—–-]\s*").expect("detail separator regex"))
}

/// Parse the task document into ordered sections.
///
/// Lines that match neither grammar are narrative and are dropped.
/// Sections that end up with zero tasks are omitted entirely.
pub fn parse_todo(raw: &str) -> TodoSections {
    let mut sections: Vec<(String, Vec<TodoTask>)> = vec![(TOP_SECTION.to_string(), Vec::new())];
    let mut current = 0usize;

    for line in raw.lines() {
        if let Some(c) = header_re().captures(line) {
            let title = c[1].trim().to_string();
            current = match sections.iter().position(|(t, _)| *t == title) {
                Some(idx) => idx,
                None => {
                    sections.push((title, Vec::new()));
                    sections.len() - 1
                }
            };
            continue;
        }
        if let Some(c) = task_re().captures(line) {
            let detail = detail_sep_re().replace(&c[3], "").trim().to_string();
            sections[current].1.push(TodoTask {
                status: c[1].to_string(),
                title: c[2].to_string(),
                detail,
            });
        }
    }

    sections.retain(|(_, tasks)| !tasks.is_empty());
    TodoSections(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_task_under_header() {
        let raw = "## Active\n- `done` | **Ship dashboard** — final polish\n";
        let sections = parse_todo(raw);
        assert_eq!(
            sections.get("Active"),
            Some(
                &[TodoTask {
                    status: "done".into(),
                    title: "Ship dashboard".into(),
                    detail: "final polish".into(),
                }][..]
            )
        );
    }

    #[test]
    fn test_empty_sections_omitted() {
        let raw = "# Planning\n\nNothing structured here.\n\n## Active\n- `wip` | **Thing**\n";
        let sections = parse_todo(raw);
        assert_eq!(sections.len(), 1);
        assert!(sections.get("Planning").is_none());
    }

    #[test]
    fn test_detail_never_starts_with_dash() {
        for sep in ["—", "–", "-"] {
            let raw = format!("- `wip` | **T** {sep} detail text");
            let sections = parse_todo(&raw);
            let task = &sections.get(TOP_SECTION).unwrap()[0];
            assert_eq!(task.detail, "detail text");
        }
    }

    #[test]
    fn test_task_without_detail() {
        let sections = parse_todo("- `todo` | **Bare task**");
        let task = &sections.get(TOP_SECTION).unwrap()[0];
        assert_eq!(task.detail, "");
    }

    #[test]
    fn test_deep_headers_not_sections() {
        let raw = "#### Notes\n- `wip` | **Task under deep header**\n";
        let sections = parse_todo(raw);
        // Level-4 header is body text, so the task lands in the implicit section
        assert!(sections.get("Notes").is_none());
        assert_eq!(sections.get(TOP_SECTION).unwrap().len(), 1);
    }

    #[test]
    fn test_section_order_preserved() {
        let raw = "\
## Zulu
- `a` | **One**
## Alpha
- `b` | **Two**
";
        let sections = parse_todo(raw);
        let titles: Vec<&str> = sections.iter().map(|(t, _)| t).collect();
        assert_eq!(titles, vec!["Zulu", "Alpha"]);
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let raw = "## B\n- `x` | **T1**\n## A\n- `y` | **T2**\n";
        let json = serde_json::to_string(&parse_todo(raw)).unwrap();
        let b_pos = json.find("\"B\"").unwrap();
        let a_pos = json.find("\"A\"").unwrap();
        assert!(b_pos < a_pos);
    }

    #[test]
    fn test_empty_document() {
        assert!(parse_todo("").is_empty());
    }
}

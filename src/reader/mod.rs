// src/reader/mod.rs — Safe resource readers
//
// Contract: absence and corruption are both "no data". A missing file, a
// permission error, or malformed JSON collapse to None; callers render an
// empty section instead of propagating a failure.

pub mod peer;

use serde::de::DeserializeOwned;
use std::path::Path;

/// Read a UTF-8 text file, collapsing any I/O failure to `None`.
pub async fn read_text_safe(path: &Path) -> Option<String> {
    tokio::fs::read_to_string(path).await.ok()
}

/// Read and deserialize a JSON file; missing or malformed content is `None`.
pub async fn read_json_safe<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let raw = read_text_safe(path).await?;
    serde_json::from_str(&raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Doc {
        value: u32,
    }

    #[tokio::test]
    async fn test_read_text_missing_is_none() {
        assert_eq!(read_text_safe(Path::new("/nonexistent/file.md")).await, None);
    }

    #[tokio::test]
    async fn test_read_text_present() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "hello").unwrap();
        assert_eq!(read_text_safe(f.path()).await.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_read_json_roundtrip() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"value": 7}}"#).unwrap();
        assert_eq!(read_json_safe::<Doc>(f.path()).await, Some(Doc { value: 7 }));
    }

    #[tokio::test]
    async fn test_read_json_malformed_is_none() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{{ not json").unwrap();
        assert_eq!(read_json_safe::<Doc>(f.path()).await, None);
    }
}

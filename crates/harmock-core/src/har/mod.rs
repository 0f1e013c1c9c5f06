//! HAR (HTTP Archive) model and loading.
//!
//! Accepts either a standard HAR document (`{"log": {"entries": [...]}}`) or
//! a bare `{"entries": [...]}` object. Anything else is rejected at the
//! boundary with [`ArchiveError::NotAnArchive`].

mod archive;
mod parse;

pub use archive::{Archive, ArchiveError};
pub use parse::{HarContent, HarEntry, HarHeader, HarLog, HarRequest, HarResponse};

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn from_path_reads_har_log() {
        let har = r#"{
            "log": {
                "version": "1.2",
                "entries": [
                    {
                        "request": { "method": "GET", "url": "https://api.example.com/users?page=2", "headers": [] },
                        "response": {
                            "status": 200,
                            "headers": [ { "name": "Content-Type", "value": "application/json" } ],
                            "content": { "text": "[]", "mimeType": "application/json" }
                        },
                        "time": 12.5
                    }
                ]
            }
        }"#;
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(har.as_bytes()).unwrap();
        f.flush().unwrap();
        let archive = Archive::from_path(f.path()).unwrap();
        assert!(matches!(archive, Archive::Har(_)));
        let entry = &archive.entries()[0];
        assert_eq!(entry.request.method, "GET");
        assert_eq!(entry.response.status, 200);
        assert_eq!(entry.response.content.text.as_deref(), Some("[]"));
        assert_eq!(entry.time, Some(12.5));
    }

    #[test]
    fn flat_entries_shape() {
        let archive = Archive::from_json_str(
            r#"{"entries":[{"request":{"method":"POST","url":"https://x.test/a"},"response":{"status":201}}]}"#,
        )
        .unwrap();
        assert!(matches!(archive, Archive::Flat(_)));
        let entry = &archive.entries()[0];
        assert!(entry.response.headers.is_empty());
        assert!(entry.response.content.text.is_none());
        assert!(entry.time.is_none());
    }

    #[test]
    fn empty_entries_is_valid_archive() {
        let archive = Archive::from_json_str(r#"{"log":{"version":"1.2","entries":[]}}"#).unwrap();
        assert!(archive.is_empty());
    }

    #[test]
    fn unrelated_document_is_not_an_archive() {
        let err = Archive::from_json_str(r#"{"pages":[]}"#).unwrap_err();
        assert!(matches!(err, ArchiveError::NotAnArchive));
        let err = Archive::from_json_str("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, ArchiveError::NotAnArchive));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = Archive::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ArchiveError::Json(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Archive::from_path(&dir.path().join("missing.har")).unwrap_err();
        assert!(matches!(err, ArchiveError::Io { .. }));
        assert!(err.to_string().contains("missing.har"));
    }

    #[test]
    fn base64_content_flag() {
        let content = HarContent {
            text: Some("aGk=".to_string()),
            encoding: Some("base64".to_string()),
            mime_type: None,
        };
        assert!(content.is_base64());
        assert!(!HarContent::default().is_base64());
    }
}

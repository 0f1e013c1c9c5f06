//! Validated web archive documents.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use super::parse::{HarEntry, HarLog};

/// Why a document could not be read as a web archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("read web archive {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse web archive JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document is not a web archive: expected `log.entries` or `entries`")]
    NotAnArchive,
}

/// The two accepted archive shapes.
#[derive(Debug, Clone)]
pub enum Archive {
    /// Standard HAR: `{"log": {"entries": [...]}}`.
    Har(HarLog),
    /// Bare entry list: `{"entries": [...]}`.
    Flat(Vec<HarEntry>),
}

#[derive(Deserialize)]
struct HarDocument {
    log: HarLog,
}

#[derive(Deserialize)]
struct FlatDocument {
    entries: Vec<HarEntry>,
}

impl Archive {
    /// Validates an already-parsed JSON document.
    ///
    /// `log` takes precedence over `entries` when both keys are present.
    pub fn from_value(value: Value) -> Result<Self, ArchiveError> {
        let object = value.as_object().ok_or(ArchiveError::NotAnArchive)?;
        if object.contains_key("log") {
            let doc: HarDocument = serde_json::from_value(value)?;
            Ok(Archive::Har(doc.log))
        } else if object.contains_key("entries") {
            let doc: FlatDocument = serde_json::from_value(value)?;
            Ok(Archive::Flat(doc.entries))
        } else {
            Err(ArchiveError::NotAnArchive)
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ArchiveError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ArchiveError> {
        Self::from_value(serde_json::from_slice(bytes)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ArchiveError> {
        let bytes = std::fs::read(path).map_err(|source| ArchiveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(&bytes)
    }

    pub fn entries(&self) -> &[HarEntry] {
        match self {
            Archive::Har(log) => &log.entries,
            Archive::Flat(entries) => entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl From<Vec<HarEntry>> for Archive {
    fn from(entries: Vec<HarEntry>) -> Self {
        Archive::Flat(entries)
    }
}
